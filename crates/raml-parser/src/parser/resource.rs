use serde_yaml::{Mapping, Value};

use crate::error::Result;
use crate::include::FileContext;
use crate::model::Resource;

use super::annotations::parse_annotations;
use super::http::{parse_methods, parse_trait_usages, parse_uri_parameters};
use super::inline_or_included;
use super::security::parse_secured_by;
use super::templates::parse_resource_type_usage;
use super::yaml::{as_mapping, field, key_str, non_empty, text};

/// Parse every `/path` key of `map` as a nested resource.
pub(super) fn parse_resources(
    map: &Mapping,
    context: &FileContext,
) -> Result<Option<Vec<Resource>>> {
    let mut resources = Vec::new();
    for (key, value) in map {
        if !key.as_str().is_some_and(|k| k.starts_with('/')) {
            continue;
        }
        let path = key_str(key, "Resource")?;
        resources.push(parse_resource(path, value, context)?);
    }
    Ok(non_empty(resources))
}

fn parse_resource(path: &str, value: &Value, context: &FileContext) -> Result<Resource> {
    inline_or_included(value, context, None, |value, context| {
        let empty = Mapping::new();
        let map = as_mapping(value, path, &empty)?;

        Ok(Resource {
            path: path.to_string(),
            display_name: text(map, "displayName", context)?,
            description: text(map, "description", context)?,
            annotations: parse_annotations(map),
            methods: parse_methods(map, context, false)?,
            resources: parse_resources(map, context)?,
            is: parse_trait_usages(field(map, "is"))?,
            resource_type: parse_resource_type_usage(field(map, "type"))?,
            secured_by: parse_secured_by(field(map, "securedBy"))?,
            uri_parameters: parse_uri_parameters(
                field(map, "uriParameters"),
                context,
                "uriParameters",
            )?,
        })
    })
}
