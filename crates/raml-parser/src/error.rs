use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::include::FragmentKind;

/// Composite node kinds whose parse failures are reported with the node's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Library,
    Trait,
    ResourceType,
    SecurityScheme,
    AnnotationType,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Library => "library",
            NodeKind::Trait => "trait",
            NodeKind::ResourceType => "resource type",
            NodeKind::SecurityScheme => "security scheme",
            NodeKind::AnnotationType => "annotation type",
        };
        f.write_str(name)
    }
}

/// Errors produced while loading and parsing a RAML document (E2001–E2041).
#[derive(Debug, Error)]
pub enum RamlError {
    /// E2001: The YAML reader rejected the text.
    #[error("E2001: YAML syntax error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// E2002: Nothing to parse.
    #[error("E2002: empty input")]
    EmptyInput,

    /// E2003: The first line is not a `#%RAML <version>` header.
    #[error("E2003: missing or malformed '#%RAML' header, found {0:?}")]
    MissingHeader(String),

    /// E2004: The header declares a version other than 1.0.
    #[error("E2004: unsupported RAML version '{0}' (only 1.0 is supported)")]
    UnsupportedVersion(String),

    /// E2010: A required key is absent.
    #[error("E2010: missing required key '{key}' in {context}")]
    MissingKey { key: String, context: String },

    /// E2011: A key holds a value of the wrong YAML kind.
    #[error("E2011: '{key}' must be {expected}, found {found}")]
    InvalidType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// E2012: A mapping key is not a string.
    #[error("E2012: {0} Key must be a String")]
    InvalidKey(&'static str),

    /// E2013: A value is outside its enumerated vocabulary.
    #[error("E2013: invalid {what} '{value}'")]
    InvalidValue { what: &'static str, value: String },

    /// E2020: An included fragment has no `#%RAML 1.0 <Kind>` header.
    #[error("E2020: missing fragment identifier in {}, expected '#%RAML 1.0 {expected}'", .path.display())]
    MissingFragmentIdentifier {
        path: PathBuf,
        expected: FragmentKind,
    },

    /// E2021: An included fragment declares the wrong kind.
    #[error("E2021: invalid fragment identifier {found:?} in {}, expected '{expected}'", .path.display())]
    InvalidFragmentIdentifier {
        path: PathBuf,
        expected: FragmentKind,
        found: String,
    },

    /// E2022: `!include` used while parsing text that has no source file.
    #[error("E2022: includes are not available when parsing from a string: !include {0}")]
    IncludesNotAvailable(String),

    /// E2023: A string appeared where only an `!include` directive is allowed.
    #[error("E2023: expected an !include directive, found '{0}'")]
    NotAnInclude(String),

    /// E2024: A file includes itself, directly or transitively.
    #[error("E2024: circular include of {}", .0.display())]
    CircularInclude(PathBuf),

    /// E2025: The include chain is deeper than the configured limit.
    #[error("E2025: include depth limit of {limit} exceeded at {}", .path.display())]
    IncludeDepthExceeded { path: PathBuf, limit: usize },

    /// E2030: A named composite node failed to parse.
    #[error("E2030: failed to parse {kind} '{name}': {source}")]
    FailedToParse {
        kind: NodeKind,
        name: String,
        #[source]
        source: Box<RamlError>,
    },

    /// E2040: A referenced file does not exist.
    #[error("E2040: file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// E2041: A referenced file exists but could not be read as UTF-8 text.
    #[error("E2041: failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// E2099: A value shape the type engine has no rule for.
    #[error("E2099: internal error: {0}")]
    Internal(String),
}

impl RamlError {
    /// The stable error code (e.g. `E2010`).
    pub fn code(&self) -> &'static str {
        match self {
            RamlError::Yaml(_) => "E2001",
            RamlError::EmptyInput => "E2002",
            RamlError::MissingHeader(_) => "E2003",
            RamlError::UnsupportedVersion(_) => "E2004",
            RamlError::MissingKey { .. } => "E2010",
            RamlError::InvalidType { .. } => "E2011",
            RamlError::InvalidKey(_) => "E2012",
            RamlError::InvalidValue { .. } => "E2013",
            RamlError::MissingFragmentIdentifier { .. } => "E2020",
            RamlError::InvalidFragmentIdentifier { .. } => "E2021",
            RamlError::IncludesNotAvailable(_) => "E2022",
            RamlError::NotAnInclude(_) => "E2023",
            RamlError::CircularInclude(_) => "E2024",
            RamlError::IncludeDepthExceeded { .. } => "E2025",
            RamlError::FailedToParse { .. } => "E2030",
            RamlError::FileNotFound { .. } => "E2040",
            RamlError::Io { .. } => "E2041",
            RamlError::Internal(_) => "E2099",
        }
    }

    /// Follows `FailedToParse` wrappers down to the error that started the failure.
    pub fn root_cause(&self) -> &RamlError {
        let mut current = self;
        while let RamlError::FailedToParse { source, .. } = current {
            current = source;
        }
        current
    }

    pub(crate) fn failed(kind: NodeKind, name: &str) -> impl FnOnce(RamlError) -> RamlError + '_ {
        move |source| RamlError::FailedToParse {
            kind,
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}

/// Result alias used throughout the parser.
pub type Result<T> = std::result::Result<T, RamlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_appear_in_messages() {
        let err = RamlError::MissingKey {
            key: "title".into(),
            context: "document root".into(),
        };
        assert_eq!(err.code(), "E2010");
        assert!(err.to_string().starts_with("E2010:"));
    }

    #[test]
    fn invalid_key_names_the_construct() {
        let err = RamlError::InvalidKey("Property");
        assert_eq!(err.to_string(), "E2012: Property Key must be a String");
    }

    #[test]
    fn root_cause_unwraps_nested_failures() {
        let inner = RamlError::FileNotFound {
            path: PathBuf::from("/tmp/lib.raml"),
        };
        let err = RamlError::failed(NodeKind::Trait, "paged")(RamlError::failed(
            NodeKind::Library,
            "common",
        )(inner));

        assert_eq!(err.code(), "E2030");
        assert!(matches!(err.root_cause(), RamlError::FileNotFound { .. }));
        assert!(err.to_string().contains("trait 'paged'"));
    }
}
