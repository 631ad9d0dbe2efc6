//! RAML 1.0 parser.
//!
//! Reads a RAML document, following `!include` directives and library
//! imports across files, into a strongly-typed document model. A second,
//! fully-defaulted view of the model is available through [`HasDefaults`].
//!
//! ```no_run
//! use raml_parser::Raml;
//!
//! let raml = Raml::from_file("api.raml")?;
//! for (path, resource) in raml.resources_depth_first() {
//!     println!("{path}: {} methods", resource.methods.as_ref().map_or(0, Vec::len));
//! }
//! # Ok::<(), raml_parser::RamlError>(())
//! ```

pub mod datatype;
pub mod defaults;
pub mod error;
pub mod include;
pub mod model;
pub mod options;
mod parser;
pub mod preprocess;

pub use datatype::{DataType, ScalarType};
pub use defaults::{HasDefaults, RootContext};
pub use error::{NodeKind, RamlError, Result};
pub use include::{FileContext, FragmentKind};
pub use model::*;
pub use options::ParseOptions;
