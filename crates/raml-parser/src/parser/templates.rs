use serde_yaml::{Mapping, Value};

use crate::error::{NodeKind, RamlError, Result};
use crate::include::{FileContext, FragmentKind};
use crate::model::{ResourceType, ResourceTypeUsage, TraitDefinition};

use super::annotations::parse_annotations;
use super::http::{
    parse_body, parse_headers, parse_methods, parse_protocols, parse_query_string,
    parse_responses, parse_trait_usages, parse_uri_parameters,
};
use super::security::parse_secured_by;
use super::types::parse_properties;
use super::yaml::{as_mapping, field, text};
use super::{declarations, inline_or_included, usage};

/// Parse a `traits` block.
pub(super) fn parse_traits(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<TraitDefinition>>> {
    declarations(value, context, "traits", "Trait", |name, value, context| {
        inline_or_included(value, context, Some(FragmentKind::Trait), |value, context| {
            parse_trait(name, value, context)
        })
        .map_err(RamlError::failed(NodeKind::Trait, name))
    })
}

fn parse_trait(name: &str, value: &Value, context: &FileContext) -> Result<TraitDefinition> {
    let empty = Mapping::new();
    let map = as_mapping(value, name, &empty)?;

    Ok(TraitDefinition {
        name: name.to_string(),
        usage: text(map, "usage", context)?,
        display_name: text(map, "displayName", context)?,
        description: text(map, "description", context)?,
        annotations: parse_annotations(map),
        headers: parse_headers(field(map, "headers"), context)?,
        query_parameters: parse_properties(field(map, "queryParameters"), context)?,
        query_string: parse_query_string(field(map, "queryString"), context)?,
        responses: parse_responses(field(map, "responses"), context)?,
        body: parse_body(field(map, "body"), context)?,
        protocols: parse_protocols(map)?,
        secured_by: parse_secured_by(field(map, "securedBy"))?,
    })
}

/// Parse a `resourceTypes` block.
pub(super) fn parse_resource_types(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<ResourceType>>> {
    declarations(value, context, "resourceTypes", "Resource Type", |name, value, context| {
        inline_or_included(value, context, Some(FragmentKind::ResourceType), |value, context| {
            parse_resource_type(name, value, context)
        })
        .map_err(RamlError::failed(NodeKind::ResourceType, name))
    })
}

fn parse_resource_type(
    identifier: &str,
    value: &Value,
    context: &FileContext,
) -> Result<ResourceType> {
    let empty = Mapping::new();
    let map = as_mapping(value, identifier, &empty)?;

    Ok(ResourceType {
        identifier: identifier.to_string(),
        usage: text(map, "usage", context)?,
        display_name: text(map, "displayName", context)?,
        description: text(map, "description", context)?,
        annotations: parse_annotations(map),
        methods: parse_methods(map, context, true)?,
        uri_parameters: parse_uri_parameters(
            field(map, "uriParameters"),
            context,
            "uriParameters",
        )?,
        is: parse_trait_usages(field(map, "is"))?,
        secured_by: parse_secured_by(field(map, "securedBy"))?,
    })
}

/// Parse the `type` of a resource.
pub(super) fn parse_resource_type_usage(
    value: Option<&Value>,
) -> Result<Option<ResourceTypeUsage>> {
    value
        .map(|value| usage(value, "type").map(|(name, parameters)| ResourceTypeUsage { name, parameters }))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HttpMethod;
    use crate::options::ParseOptions;
    use std::fs;
    use tempfile::TempDir;

    fn detached() -> FileContext {
        FileContext::detached(ParseOptions::default())
    }

    #[test]
    fn parses_trait_definitions() {
        let value: Value = serde_yaml::from_str(
            r#"
paged:
  usage: Apply to collections
  queryParameters:
    page:
      type: integer
      minimum: 1
  headers:
    X-Page-Size: integer
secured:
"#,
        )
        .unwrap();

        let traits = parse_traits(Some(&value), &detached()).unwrap().unwrap();
        assert_eq!(traits[0].name, "paged");
        assert_eq!(traits[0].usage.as_deref(), Some("Apply to collections"));
        assert_eq!(traits[0].query_parameters.as_ref().unwrap()[0].name, "page");
        assert_eq!(traits[0].headers.as_ref().unwrap()[0].key, "X-Page-Size");
        assert_eq!(traits[1].name, "secured");
        assert!(traits[1].headers.is_none());
    }

    #[test]
    fn resource_type_keeps_placeholders_verbatim() {
        let value: Value = serde_yaml::from_str(
            r#"
collection:
  usage: A list of <<item>>
  description: Collection of <<resourcePathName>>
  get:
    description: List <<resourcePathName>>
  post?:
    body:
      application/json: <<item>>
"#,
        )
        .unwrap();

        let types = parse_resource_types(Some(&value), &detached()).unwrap().unwrap();
        let collection = &types[0];
        assert_eq!(
            collection.description.as_deref(),
            Some("Collection of <<resourcePathName>>")
        );

        let get = collection.method_with_verb(HttpMethod::Get).unwrap();
        assert!(!get.optional);
        let post = collection.method_with_verb(HttpMethod::Post).unwrap();
        assert!(post.optional);
        assert!(post.body.as_ref().unwrap().media_type("application/json").is_some());
    }

    #[test]
    fn trait_fragment_must_declare_trait() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("paged.raml"), "#%RAML 1.0 Library\n").unwrap();
        let context = FileContext::for_file(dir.path().join("api.raml"), ParseOptions::default());
        let value: Value = serde_yaml::from_str("paged: !include paged.raml\n").unwrap();

        let err = parse_traits(Some(&value), &context).unwrap_err();
        assert!(matches!(
            err,
            RamlError::FailedToParse { kind: NodeKind::Trait, ref name, .. } if name == "paged"
        ));
        assert!(matches!(
            err.root_cause(),
            RamlError::InvalidFragmentIdentifier { ref found, .. } if found == "Library"
        ));
    }

    #[test]
    fn trait_from_fragment() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("traits")).unwrap();
        fs::write(
            dir.path().join("traits/paged.raml"),
            "#%RAML 1.0 Trait\nqueryParameters:\n  page: integer\n",
        )
        .unwrap();
        let context = FileContext::for_file(dir.path().join("api.raml"), ParseOptions::default());
        let value: Value = serde_yaml::from_str("paged: !include traits/paged.raml\n").unwrap();

        let traits = parse_traits(Some(&value), &context).unwrap().unwrap();
        assert_eq!(traits[0].query_parameters.as_ref().unwrap()[0].name, "page");
    }

    #[test]
    fn resource_type_usage_with_parameters() {
        let value: Value = serde_yaml::from_str("collection: { item: User }").unwrap();
        let usage = parse_resource_type_usage(Some(&value)).unwrap().unwrap();
        assert_eq!(usage.name, "collection");
        assert_eq!(usage.parameter("item"), Some(&Value::String("User".into())));
    }
}
