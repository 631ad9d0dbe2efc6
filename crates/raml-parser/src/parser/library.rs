use serde_yaml::{Mapping, Value};

use crate::error::{NodeKind, RamlError, Result};
use crate::include::{self, FileContext, FragmentKind};
use crate::model::Library;

use super::annotations::parse_annotation_types;
use super::declarations;
use super::security::parse_security_schemes;
use super::templates::{parse_resource_types, parse_traits};
use super::types::parse_types;
use super::yaml::{as_mapping, field, text};

/// Parse a `uses` block.
///
/// Entries are usually written as a bare path to a `Library` fragment; the
/// `!include` form and inline mappings are accepted as well. Libraries may
/// import further libraries.
pub(super) fn parse_uses(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<Library>>> {
    declarations(value, context, "uses", "Library", |name, value, context| {
        parse_library_entry(name, value, context)
            .map_err(RamlError::failed(NodeKind::Library, name))
    })
}

fn parse_library_entry(identifier: &str, value: &Value, context: &FileContext) -> Result<Library> {
    let target = include::include_target(value).or_else(|| value.as_str().map(str::trim));
    match target {
        Some(target) => {
            let included = include::resolve_target(target, context, Some(FragmentKind::Library))?;
            parse_library(identifier, &included.value, &included.context)
        }
        None => parse_library(identifier, value, context),
    }
}

fn parse_library(identifier: &str, value: &Value, context: &FileContext) -> Result<Library> {
    let empty = Mapping::new();
    let map = as_mapping(value, identifier, &empty)?;

    Ok(Library {
        identifier: identifier.to_string(),
        usage: text(map, "usage", context)?,
        types: parse_types(field(map, "types"), context)?,
        resource_types: parse_resource_types(field(map, "resourceTypes"), context)?,
        traits: parse_traits(field(map, "traits"), context)?,
        security_schemes: parse_security_schemes(field(map, "securitySchemes"), context)?,
        annotation_types: parse_annotation_types(field(map, "annotationTypes"), context)?,
        uses: parse_uses(field(map, "uses"), context)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn nested_libraries_resolve_relative_to_each_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("libs/base")).unwrap();
        fs::write(
            dir.path().join("libs/common.raml"),
            "#%RAML 1.0 Library\nusage: Shared types\nuses:\n  base: base/ids.raml\ntypes:\n  User:\n    properties:\n      id: base.Id\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("libs/base/ids.raml"),
            "#%RAML 1.0 Library\ntypes:\n  Id: string\n",
        )
        .unwrap();

        let context = FileContext::for_file(dir.path().join("api.raml"), ParseOptions::default());
        let value: Value = serde_yaml::from_str("common: libs/common.raml\n").unwrap();
        let libraries = parse_uses(Some(&value), &context).unwrap().unwrap();

        let common = &libraries[0];
        assert_eq!(common.identifier, "common");
        assert_eq!(common.usage.as_deref(), Some("Shared types"));
        assert!(common.type_named("User").is_some());
        let base = common.library_with_identifier("base").unwrap();
        assert!(base.type_named("Id").is_some());
    }

    #[test]
    fn library_cycle_is_detected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.raml"), "#%RAML 1.0 Library\nuses:\n  b: b.raml\n").unwrap();
        fs::write(dir.path().join("b.raml"), "#%RAML 1.0 Library\nuses:\n  a: a.raml\n").unwrap();

        let context = FileContext::for_file(dir.path().join("api.raml"), ParseOptions::default());
        let value: Value = serde_yaml::from_str("a: a.raml\n").unwrap();
        let err = parse_uses(Some(&value), &context).unwrap_err();

        assert!(matches!(err, RamlError::FailedToParse { kind: NodeKind::Library, .. }));
        assert!(matches!(err.root_cause(), RamlError::CircularInclude(_)));
    }

    #[test]
    fn shared_library_used_from_two_parents() {
        let dir = TempDir::new().unwrap();
        let shared = "#%RAML 1.0 Library\ntypes:\n  Id: string\n";
        fs::write(dir.path().join("shared.raml"), shared).unwrap();
        let parent = "#%RAML 1.0 Library\nuses:\n  s: shared.raml\n";
        fs::write(dir.path().join("a.raml"), parent).unwrap();
        fs::write(dir.path().join("b.raml"), parent).unwrap();

        let context = FileContext::for_file(dir.path().join("api.raml"), ParseOptions::default());
        let value: Value = serde_yaml::from_str("a: a.raml\nb: b.raml\n").unwrap();
        let libraries = parse_uses(Some(&value), &context).unwrap().unwrap();

        assert_eq!(libraries.len(), 2);
        for library in &libraries {
            let shared = library.library_with_identifier("s").unwrap();
            assert!(shared.type_named("Id").is_some());
        }
    }

    #[test]
    fn library_must_declare_library_fragment() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lib.raml"), "types:\n  Id: string\n").unwrap();

        let context = FileContext::for_file(dir.path().join("api.raml"), ParseOptions::default());
        let value: Value = serde_yaml::from_str("lib: !include lib.raml\n").unwrap();
        let err = parse_uses(Some(&value), &context).unwrap_err();

        assert!(matches!(err.root_cause(), RamlError::MissingFragmentIdentifier { .. }));
    }

    #[test]
    fn missing_library_file() {
        let dir = TempDir::new().unwrap();
        let context = FileContext::for_file(dir.path().join("api.raml"), ParseOptions::default());
        let value: Value = serde_yaml::from_str("lib: missing.raml\n").unwrap();
        let err = parse_uses(Some(&value), &context).unwrap_err();

        match err.root_cause() {
            RamlError::FileNotFound { path } => assert_eq!(path, &dir.path().join("missing.raml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn inline_library() {
        let context = FileContext::detached(ParseOptions::default());
        let value: Value = serde_yaml::from_str("lib:\n  types:\n    Id: string\n").unwrap();
        let libraries = parse_uses(Some(&value), &context).unwrap().unwrap();
        assert!(libraries[0].type_named("Id").is_some());
    }
}
