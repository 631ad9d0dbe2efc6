//! Logging setup for the RAML command-line tools.
//!
//! The parser library only emits `tracing` events; binaries call
//! [`init_logging`] once to decide where and how they are written.
//!
//! # Usage
//!
//! ```no_run
//! use raml_telemetry::{init_logging, LogFormat, TelemetryConfig};
//!
//! let config = TelemetryConfig::new()
//!     .with_log_level("debug")
//!     .with_log_format(LogFormat::Json);
//!
//! init_logging(&config)?;
//! # Ok::<(), raml_telemetry::TelemetryError>(())
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::{events, init_logging};

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log level is not a valid filter directive.
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
