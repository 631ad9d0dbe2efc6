use serde_yaml::Value;

use crate::error::{RamlError, Result};
use crate::include::FileContext;
use crate::model::{DocumentationEntry, MediaType, Raml};

use super::annotations::{parse_annotation_types, parse_annotations};
use super::http::{parse_protocols, parse_uri_parameters};
use super::library::parse_uses;
use super::resource::parse_resources;
use super::security::{parse_secured_by, parse_security_schemes};
use super::templates::{parse_resource_types, parse_traits};
use super::types::parse_types;
use super::yaml::{field, invalid, non_empty, string, string_list, text};

const ROOT: &str = "document root";

/// Build the document from the root YAML value.
pub(super) fn parse_raml(value: &Value, context: &FileContext) -> Result<Raml> {
    let map = match value {
        Value::Mapping(map) => map,
        Value::Null => {
            return Err(RamlError::MissingKey {
                key: "title".to_string(),
                context: ROOT.to_string(),
            })
        }
        other => return Err(invalid(ROOT, "a mapping", other)),
    };

    let title = text(map, "title", context)?.ok_or_else(|| RamlError::MissingKey {
        key: "title".to_string(),
        context: ROOT.to_string(),
    })?;

    Ok(Raml {
        title,
        description: text(map, "description", context)?,
        version: string(map, "version")?,
        base_uri: string(map, "baseUri")?,
        base_uri_parameters: parse_uri_parameters(
            field(map, "baseUriParameters"),
            context,
            "baseUriParameters",
        )?,
        protocols: parse_protocols(map)?,
        media_types: string_list(map, "mediaType")?
            .map(|types| types.into_iter().map(MediaType::new).collect()),
        documentation: parse_documentation(field(map, "documentation"), context)?,
        types: parse_types(field(map, "types"), context)?,
        traits: parse_traits(field(map, "traits"), context)?,
        resource_types: parse_resource_types(field(map, "resourceTypes"), context)?,
        annotation_types: parse_annotation_types(field(map, "annotationTypes"), context)?,
        security_schemes: parse_security_schemes(field(map, "securitySchemes"), context)?,
        secured_by: parse_secured_by(field(map, "securedBy"))?,
        uses: parse_uses(field(map, "uses"), context)?,
        resources: parse_resources(map, context)?,
        annotations: parse_annotations(map),
    })
}

/// Parse the `documentation` list. Each entry needs a title and content;
/// content is often an included Markdown file.
fn parse_documentation(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<DocumentationEntry>>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let Value::Sequence(items) = value else {
        return Err(invalid("documentation", "a sequence", value));
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let Value::Mapping(map) = item else {
            return Err(invalid("documentation", "a sequence of mappings", item));
        };
        let title = text(map, "title", context)?.ok_or_else(|| RamlError::MissingKey {
            key: "title".to_string(),
            context: "documentation entry".to_string(),
        })?;
        let content = text(map, "content", context)?.ok_or_else(|| RamlError::MissingKey {
            key: "content".to_string(),
            context: format!("documentation entry '{}'", title),
        })?;

        entries.push(DocumentationEntry {
            title,
            content,
            annotations: parse_annotations(map),
        });
    }

    Ok(non_empty(entries))
}
