//! Recursive-descent parsers from YAML values to model nodes.
//!
//! Every parse function takes the node's YAML value and the [`FileContext`] of
//! the file the value came from. The context is passed down unchanged and is
//! only replaced when an include switches to another file.

mod annotations;
mod document;
mod http;
mod library;
mod resource;
mod security;
mod templates;
mod types;
pub(crate) mod yaml;

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{RamlError, Result};
use crate::include::{self, FileContext, FragmentKind};
use crate::model::Raml;
use crate::options::ParseOptions;
use crate::preprocess;

use yaml::{invalid, key_str, non_empty};

const HEADER_PREFIX: &str = "#%RAML";
const SUPPORTED_VERSION: &str = "1.0";

impl Raml {
    /// Parse a document from disk. Includes resolve relative to `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Raml> {
        Raml::from_file_with_options(path, ParseOptions::default())
    }

    /// Parse a document from disk with explicit options.
    pub fn from_file_with_options(path: impl AsRef<Path>, options: ParseOptions) -> Result<Raml> {
        let path = absolute(path.as_ref());
        let text = include::read_file(&path)?;
        let context = FileContext::for_file(&path, options);
        parse_document(&text, &context)
    }

    /// Parse a document held in memory. Any `!include` fails with
    /// [`RamlError::IncludesNotAvailable`].
    pub fn from_string(text: &str) -> Result<Raml> {
        Raml::from_string_with_options(text, ParseOptions::default())
    }

    /// Parse an in-memory document with explicit options.
    pub fn from_string_with_options(text: &str, options: ParseOptions) -> Result<Raml> {
        parse_document(text, &FileContext::detached(options))
    }
}

/// Check the header, read the YAML body and build the document.
fn parse_document(text: &str, context: &FileContext) -> Result<Raml> {
    check_header(text)?;

    let value = preprocess::parse_yaml(text, context.options())?;
    if !context.includes_available() {
        include::ensure_no_includes(&value)?;
    }

    debug!(
        file = context.file().map(|p| p.display().to_string()),
        "parsing RAML document"
    );

    let raml = document::parse_raml(&value, context)?;

    debug!(
        title = %raml.title,
        resources = raml.resources_depth_first().len(),
        libraries = raml.uses.as_ref().map_or(0, Vec::len),
        "parsed RAML document"
    );

    Ok(raml)
}

/// The first line must read `#%RAML 1.0`.
fn check_header(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RamlError::EmptyInput);
    }

    let first = text
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches('\u{feff}')
        .trim_end();

    let Some(version) = first.strip_prefix(HEADER_PREFIX) else {
        return Err(RamlError::MissingHeader(first.to_string()));
    };
    if !version.starts_with(' ') {
        return Err(RamlError::MissingHeader(first.to_string()));
    }

    match version.trim() {
        SUPPORTED_VERSION => Ok(()),
        "" => Err(RamlError::MissingHeader(first.to_string())),
        other => Err(RamlError::UnsupportedVersion(other.to_string())),
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Parse a node that may be written inline or pulled in with `!include`.
///
/// With a `fragment` kind, the slot only holds mappings, so any string must be
/// an include directive and the included file must declare that kind.
fn inline_or_included<T>(
    value: &Value,
    context: &FileContext,
    fragment: Option<FragmentKind>,
    parse: impl FnOnce(&Value, &FileContext) -> Result<T>,
) -> Result<T> {
    if include::is_include(value) {
        let included = include::resolve(value, context, fragment)?;
        return parse(&included.value, &included.context);
    }
    if let (Some(_), Value::String(s)) = (fragment, value) {
        return Err(RamlError::NotAnInclude(s.clone()));
    }
    parse(value, context)
}

/// Parse each `name: value` entry of a declaration block such as `types` or
/// `headers`. The block itself may be included from another file.
fn declarations<T>(
    value: Option<&Value>,
    context: &FileContext,
    key: &str,
    construct: &'static str,
    mut parse: impl FnMut(&str, &Value, &FileContext) -> Result<T>,
) -> Result<Option<Vec<T>>> {
    let Some(value) = value else {
        return Ok(None);
    };

    if include::is_include(value) {
        let included = include::resolve(value, context, None)?;
        return declarations(
            Some(&included.value),
            &included.context,
            key,
            construct,
            parse,
        );
    }

    let map = match value {
        Value::Mapping(map) => map,
        Value::Null => return Ok(None),
        other => return Err(invalid(key, "a mapping", other)),
    };

    let mut items = Vec::with_capacity(map.len());
    for (name, value) in map {
        let name = key_str(name, construct)?;
        items.push(parse(name, value, context)?);
    }
    Ok(non_empty(items))
}

/// A reference to a template or scheme: either `name` or `{ name: parameters }`.
fn usage(value: &Value, key: &str) -> Result<(String, Option<Mapping>)> {
    match value {
        Value::String(name) => Ok((name.clone(), None)),
        Value::Mapping(map) if map.len() == 1 => {
            let Some((name, parameters)) = map.iter().next() else {
                return Err(invalid(key, "a name or a single-entry mapping", value));
            };
            let name = key_str(name, "Usage")?.to_string();
            let parameters = match parameters {
                Value::Null => None,
                Value::Mapping(parameters) => Some(parameters.clone()),
                other => return Err(invalid(&name, "a mapping of parameters", other)),
            };
            Ok((name, parameters))
        }
        other => Err(invalid(key, "a name or a single-entry mapping", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_version_one() {
        assert!(check_header("#%RAML 1.0\ntitle: x\n").is_ok());
        assert!(check_header("#%RAML 1.0   \r\ntitle: x\n").is_ok());
    }

    #[test]
    fn rejects_other_versions() {
        let err = check_header("#%RAML 0.8\ntitle: x\n").unwrap_err();
        assert!(matches!(err, RamlError::UnsupportedVersion(ref v) if v == "0.8"));

        let err = check_header("#%RAML 1.0 Library\n").unwrap_err();
        assert!(matches!(err, RamlError::UnsupportedVersion(_)));
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            check_header("title: x\n").unwrap_err(),
            RamlError::MissingHeader(_)
        ));
        assert!(matches!(
            check_header("#%RAML\ntitle: x\n").unwrap_err(),
            RamlError::MissingHeader(_)
        ));
        assert!(matches!(
            check_header("#%RAML1.0\n").unwrap_err(),
            RamlError::MissingHeader(_)
        ));
        assert!(matches!(check_header("  \n").unwrap_err(), RamlError::EmptyInput));
    }

    #[test]
    fn title_from_string() {
        let raml = Raml::from_string("#%RAML 1.0\ntitle: Hello\n").unwrap();
        assert_eq!(raml.title, "Hello");

        let err = Raml::from_string("#%RAML 0.8\ntitle: Hello\n").unwrap_err();
        assert_eq!(err.code(), "E2004");
    }

    #[test]
    fn includes_fail_from_string_wherever_they_appear() {
        let documents = [
            "#%RAML 1.0\ntitle: !include title.txt\n",
            "#%RAML 1.0\ntitle: x\ntypes:\n  User: !include user.raml\n",
            "#%RAML 1.0\ntitle: x\n/users:\n  get:\n    responses:\n      200:\n        body:\n          application/json:\n            example: !include user.json\n",
            "#%RAML 1.0\ntitle: x\nuses:\n  lib: !include lib.raml\n",
        ];
        for text in documents {
            let err = Raml::from_string(text).unwrap_err();
            assert!(
                matches!(err, RamlError::IncludesNotAvailable(_)),
                "unexpected error for {text:?}: {err}"
            );
        }
    }

    #[test]
    fn empty_key_values_become_null() {
        let raml = Raml::from_string(
            "#%RAML 1.0\ntitle: x\n/users:\n  get:\n  post:\n/health:\n",
        )
        .unwrap();
        let users = raml.resource_with_path("/users").unwrap();
        assert_eq!(users.methods.as_ref().unwrap().len(), 2);
        assert!(raml.resource_with_path("/health").is_some());
    }

    #[test]
    fn documentation_block_content_is_kept_verbatim() {
        let text =
            "#%RAML 1.0\ntitle: x\ndocumentation:\n  - content: |\n      ratio: 1,5\n    title: Guide\n";
        let raml = Raml::from_string(text).unwrap();
        let options = ParseOptions::new().with_preprocess(false);
        let plain = Raml::from_string_with_options(text, options).unwrap();

        let guide = raml.documentation_titled("Guide").unwrap();
        assert_eq!(guide.content, "ratio: 1,5\n");
        assert_eq!(raml.documentation, plain.documentation);
    }

    #[test]
    fn yaml_errors_are_wrapped() {
        let err = Raml::from_string("#%RAML 1.0\ntitle: [unclosed\n").unwrap_err();
        assert_eq!(err.code(), "E2001");
    }

    #[test]
    fn file_with_includes() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/intro.md"), "Welcome").unwrap();
        std::fs::write(
            dir.path().join("api.raml"),
            "#%RAML 1.0\ntitle: Files\ndocumentation:\n  - title: Intro\n    content: !include docs/intro.md\n/users:\n  /{id}:\n    /posts:\n      get:\n",
        )
        .unwrap();

        let raml = Raml::from_file(dir.path().join("api.raml")).unwrap();
        assert_eq!(raml.documentation.as_ref().unwrap()[0].content, "Welcome");

        let visited = raml.resources_depth_first();
        assert_eq!(visited.len(), 3);
        assert_eq!(visited[2].0, "/users/{id}/posts");
    }

    #[test]
    fn missing_documentation_file_reports_absolute_path() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(
            dir.path().join("a/b/main.raml"),
            "#%RAML 1.0\ntitle: x\ndocumentation:\n  - title: Guide\n    content: !include docs/x.md\n",
        )
        .unwrap();

        let err = Raml::from_file(dir.path().join("a/b/main.raml")).unwrap_err();
        match err {
            RamlError::FileNotFound { path } => assert_eq!(path, dir.path().join("a/b/docs/x.md")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_root_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Raml::from_file(dir.path().join("nope.raml")).unwrap_err();
        assert!(matches!(err, RamlError::FileNotFound { .. }));
    }

    #[test]
    fn usage_forms() {
        let plain = Value::String("paged".into());
        assert_eq!(usage(&plain, "is").unwrap(), ("paged".to_string(), None));

        let with_params: Value = serde_yaml::from_str("paged: { size: 10 }").unwrap();
        let (name, params) = usage(&with_params, "is").unwrap();
        assert_eq!(name, "paged");
        assert_eq!(params.unwrap().get("size"), Some(&Value::Number(10.into())));

        let bad = Value::Number(3.into());
        assert!(matches!(usage(&bad, "is").unwrap_err(), RamlError::InvalidType { .. }));
    }
}
