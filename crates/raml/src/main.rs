//! RAML command-line tool.
//!
//! Validates RAML 1.0 documents and dumps their parsed model as JSON.

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use raml_parser::{Raml, RamlError};
use raml_telemetry::{init_logging, LogFormat, TelemetryConfig};

#[derive(Parser, Debug)]
#[command(name = "raml", about = "RAML 1.0 validator and model dumper", version)]
struct Cli {
    /// Log level filter, overridden by RUST_LOG.
    #[arg(long, global = true, env = "RAML_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (pretty or json).
    #[arg(long, global = true, env = "RAML_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse RAML document(s) and report whether they are valid.
    ///
    /// Every error carries a stable code (E2001-E2099).
    Validate {
        /// Input RAML file(s).
        #[arg(short, long, required = true, num_args = 1..)]
        file: Vec<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the parsed document model as JSON.
    Dump {
        /// Input RAML file.
        #[arg(short, long)]
        file: String,

        /// Fill in implicit RAML defaults before printing.
        #[arg(long)]
        defaults: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ValidationResult {
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    errors: Vec<ValidationIssue>,
}

#[derive(Serialize)]
struct ValidationIssue {
    code: &'static str,
    message: String,
    /// Code of the innermost error when the failure is nested in a named node.
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<&'static str>,
}

impl From<&RamlError> for ValidationIssue {
    fn from(error: &RamlError) -> Self {
        let code = error.code();
        let message = error.to_string();
        let message = message
            .strip_prefix(code)
            .and_then(|rest| rest.strip_prefix(": "))
            .map(str::to_string)
            .unwrap_or(message);
        let root = error.root_cause().code();
        ValidationIssue {
            code,
            message,
            cause: (root != code).then_some(root),
        }
    }
}

/// Run the validate command.
fn run_validate(files: &[String], output_format: OutputFormat) -> ExitCode {
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        let result = match Raml::from_file(Path::new(file)) {
            Ok(raml) => {
                raml_telemetry::log_document_parsed!(
                    file = %file,
                    title = %raml.title,
                    resources = raml.resources_depth_first().len()
                );
                ValidationResult {
                    file: file.clone(),
                    valid: true,
                    title: Some(raml.title),
                    errors: Vec::new(),
                }
            }
            Err(e) => {
                raml_telemetry::log_validation_failure!(file = %file, code = e.code(), error = %e);
                ValidationResult {
                    file: file.clone(),
                    valid: false,
                    title: None,
                    errors: vec![ValidationIssue::from(&e)],
                }
            }
        };
        results.push(result);
    }

    let has_errors = results.iter().any(|r| !r.valid);

    match output_format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "results": results,
                "summary": {
                    "total": results.len(),
                    "valid": results.iter().filter(|r| r.valid).count(),
                    "invalid": results.iter().filter(|r| !r.valid).count(),
                }
            });
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("error: failed to serialize report: {}", e);
                    return ExitCode::from(1);
                }
            }
        }
        OutputFormat::Text => {
            for result in &results {
                if result.valid {
                    eprintln!("✓ {} is valid", result.file);
                } else {
                    eprintln!("✗ {} has {} error(s)", result.file, result.errors.len());
                }

                for err in &result.errors {
                    match err.cause {
                        Some(cause) => eprintln!("  {} ({}): {}", err.code, cause, err.message),
                        None => eprintln!("  {}: {}", err.code, err.message),
                    }
                }
            }

            let valid_count = results.iter().filter(|r| r.valid).count();
            let total = results.len();
            eprintln!();
            eprintln!(
                "validated {} file(s): {} valid, {} invalid",
                total,
                valid_count,
                total - valid_count
            );
        }
    }

    if has_errors {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the dump command.
fn run_dump(file: &str, defaults: bool) -> ExitCode {
    let raml = match Raml::from_file(Path::new(file)) {
        Ok(raml) => raml,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };
    let raml = if defaults { raml.defaulted() } else { raml };

    match serde_json::to_string_pretty(&raml) {
        Ok(json) => {
            println!("{}", json);
            raml_telemetry::log_document_dumped!(file = %file, defaults = defaults);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize {}: {}", file, e);
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(log_format) = LogFormat::parse(&cli.log_format) else {
        eprintln!(
            "error: invalid log format '{}' (expected pretty or json)",
            cli.log_format
        );
        return ExitCode::from(2);
    };
    let config = TelemetryConfig::new()
        .with_log_level(cli.log_level.as_str())
        .with_log_format(log_format)
        .with_ansi(std::io::stderr().is_terminal());
    if let Err(e) = init_logging(&config) {
        eprintln!("error: {}", e);
        return ExitCode::from(2);
    }

    raml_telemetry::log_startup!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Commands::Validate { file, format } => run_validate(&file, format),
        Commands::Dump { file, defaults } => run_dump(&file, defaults),
    }
}
