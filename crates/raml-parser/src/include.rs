//! `!include` resolution.
//!
//! Include targets are resolved relative to the directory of the file that
//! contains the directive. Every include is read from disk independently; the
//! chain of files currently being included is tracked so a file that includes
//! itself, directly or through other files, fails instead of recursing.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::error::{RamlError, Result};
use crate::options::ParseOptions;
use crate::preprocess;

const INCLUDE_TAG: &str = "!include";
const HEADER_PREFIX: &str = "#%RAML 1.0";

/// The declared kind of an included fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Library,
    Trait,
    ResourceType,
    SecurityScheme,
}

impl FragmentKind {
    /// The identifier written after `#%RAML 1.0` in a fragment header.
    pub fn identifier(&self) -> &'static str {
        match self {
            FragmentKind::Library => "Library",
            FragmentKind::Trait => "Trait",
            FragmentKind::ResourceType => "ResourceType",
            FragmentKind::SecurityScheme => "SecurityScheme",
        }
    }

    /// Parse a fragment identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Library" => Some(Self::Library),
            "Trait" => Some(Self::Trait),
            "ResourceType" => Some(Self::ResourceType),
            "SecurityScheme" => Some(Self::SecurityScheme),
            _ => None,
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// The source file a node is being parsed from.
///
/// Passed unchanged through recursive parsing and replaced only when an
/// include switches to another file.
#[derive(Debug, Clone)]
pub struct FileContext {
    file: Option<PathBuf>,
    chain: Vec<PathBuf>,
    options: ParseOptions,
}

impl FileContext {
    /// Context for a document loaded from `path`. Includes are enabled.
    pub fn for_file(path: impl Into<PathBuf>, options: ParseOptions) -> Self {
        let path = path.into();
        Self {
            chain: vec![identity(&path)],
            file: Some(path),
            options,
        }
    }

    /// Context for a document parsed from memory. Includes are unavailable.
    pub fn detached(options: ParseOptions) -> Self {
        Self {
            file: None,
            chain: Vec::new(),
            options,
        }
    }

    /// The file being parsed, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Whether `!include` directives can be followed.
    pub fn includes_available(&self) -> bool {
        self.file.is_some()
    }

    /// The options of the parse this context belongs to.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Number of includes between the root document and this file.
    pub fn depth(&self) -> usize {
        self.chain.len().saturating_sub(1)
    }

    fn enter(&self, path: PathBuf) -> Result<FileContext> {
        let id = identity(&path);
        if self.chain.contains(&id) {
            return Err(RamlError::CircularInclude(path));
        }
        if self.depth() >= self.options.max_include_depth {
            return Err(RamlError::IncludeDepthExceeded {
                path,
                limit: self.options.max_include_depth,
            });
        }

        let mut chain = self.chain.clone();
        chain.push(id);
        Ok(FileContext {
            file: Some(path),
            chain,
            options: self.options,
        })
    }
}

/// An included YAML fragment together with the context for parsing it.
#[derive(Debug, Clone)]
pub struct Included {
    /// The fragment body.
    pub value: Value,
    /// Context carrying the fragment's own path.
    pub context: FileContext,
}

/// Whether `value` is an include directive.
pub fn is_include(value: &Value) -> bool {
    include_target(value).is_some()
}

/// The relative path of an include directive.
///
/// Accepts both the tagged form (`!include path`) and a string that spells
/// the directive out.
pub fn include_target(value: &Value) -> Option<&str> {
    match value {
        Value::Tagged(tagged) if tagged.tag == INCLUDE_TAG => {
            tagged.value.as_str().map(str::trim)
        }
        Value::String(s) => s
            .strip_prefix(INCLUDE_TAG)
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .map(str::trim),
        _ => None,
    }
}

/// Absolute path of an include target, relative to the including file.
pub fn resolve_path(target: &str, context: &FileContext) -> Result<PathBuf> {
    let parent = context
        .file()
        .ok_or_else(|| RamlError::IncludesNotAvailable(target.to_string()))?;
    let base = parent.parent().unwrap_or_else(|| Path::new(""));
    Ok(base.join(target))
}

/// Load and parse the YAML fragment an include directive points at.
///
/// When `permitted` is given, the fragment's header must declare exactly that kind.
pub fn resolve(
    value: &Value,
    context: &FileContext,
    permitted: Option<FragmentKind>,
) -> Result<Included> {
    resolve_target(directive(value)?, context, permitted)
}

/// Load and parse the YAML fragment at `target`, a path relative to the including file.
pub fn resolve_target(
    target: &str,
    context: &FileContext,
    permitted: Option<FragmentKind>,
) -> Result<Included> {
    let path = resolve_path(target, context)?;
    let child = context.enter(path.clone())?;
    let text = read_file(&path)?;

    if let Some(kind) = permitted {
        check_fragment_header(&text, &path, kind)?;
    }

    debug!(
        include = target,
        path = %path.display(),
        fragment = permitted.map(|k| k.identifier()),
        depth = child.depth(),
        "resolved include"
    );

    let value = preprocess::parse_yaml(&text, context.options())?;
    Ok(Included {
        value,
        context: child,
    })
}

/// Read the text file an include directive points at.
pub fn read_text(value: &Value, context: &FileContext) -> Result<String> {
    let target = directive(value)?;
    let path = resolve_path(target, context)?;
    context.enter(path.clone())?;
    debug!(include = target, path = %path.display(), "resolved text include");
    read_file(&path)
}

/// Fail on the first include directive anywhere in `value`.
pub fn ensure_no_includes(value: &Value) -> Result<()> {
    if let Some(target) = include_target(value) {
        return Err(RamlError::IncludesNotAvailable(target.to_string()));
    }
    match value {
        Value::Sequence(items) => items.iter().try_for_each(ensure_no_includes),
        Value::Mapping(map) => map.values().try_for_each(ensure_no_includes),
        Value::Tagged(tagged) => ensure_no_includes(&tagged.value),
        _ => Ok(()),
    }
}

/// Read a whole file as UTF-8 text.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(RamlError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| RamlError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn directive(value: &Value) -> Result<&str> {
    include_target(value).ok_or_else(|| {
        RamlError::NotAnInclude(match value {
            Value::String(s) => s.clone(),
            other => serde_yaml::to_string(other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        })
    })
}

fn check_fragment_header(text: &str, path: &Path, expected: FragmentKind) -> Result<()> {
    let first = text.lines().next().unwrap_or_default().trim_end();
    let Some(rest) = first.strip_prefix(HEADER_PREFIX) else {
        return Err(RamlError::MissingFragmentIdentifier {
            path: path.to_path_buf(),
            expected,
        });
    };

    let found = rest.trim();
    if found.is_empty() {
        return Err(RamlError::MissingFragmentIdentifier {
            path: path.to_path_buf(),
            expected,
        });
    }

    match FragmentKind::parse(found) {
        Some(kind) if kind == expected => Ok(()),
        _ => Err(RamlError::InvalidFragmentIdentifier {
            path: path.to_path_buf(),
            expected,
            found: found.to_string(),
        }),
    }
}

/// Comparable identity of a file for cycle detection.
fn identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
