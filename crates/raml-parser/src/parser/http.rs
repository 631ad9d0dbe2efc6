//! Methods and what hangs off them: headers, query parameters, bodies and responses.

use serde_yaml::{Mapping, Value};
use tracing::trace;

use crate::datatype::DataType;
use crate::error::{RamlError, Result};
use crate::include::FileContext;
use crate::model::{
    Annotation, Body, Example, Header, HttpMethod, MediaType, MediaTypeBody, Method, Protocol,
    QueryString, Response, TraitUsage, UriParameter,
};

use super::annotations::parse_annotations;
use super::security::parse_secured_by;
use super::types::{parse_examples, parse_properties};
use super::yaml::{
    as_mapping, boolean, field, invalid, key_str, non_empty, string, string_list, text,
};
use super::{declarations, inline_or_included, usage};

/// Parse the verb keys of a resource or resource type.
///
/// `verb?` keys are only meaningful inside resource types and are accepted
/// when `allow_optional` is set.
pub(super) fn parse_methods(
    map: &Mapping,
    context: &FileContext,
    allow_optional: bool,
) -> Result<Option<Vec<Method>>> {
    let mut methods = Vec::new();

    for (key, value) in map {
        let Some(key) = key.as_str() else {
            continue;
        };
        let (verb, optional) = match key.strip_suffix('?') {
            Some(verb) if allow_optional => (verb, true),
            Some(_) => continue,
            None => (key, false),
        };
        if let Some(verb) = HttpMethod::parse(verb) {
            methods.push(parse_method(verb, optional, value, context)?);
        }
    }

    Ok(non_empty(methods))
}

fn parse_method(
    verb: HttpMethod,
    optional: bool,
    value: &Value,
    context: &FileContext,
) -> Result<Method> {
    let empty = Mapping::new();
    let map = as_mapping(value, verb.as_str(), &empty)?;

    Ok(Method {
        method: verb,
        optional,
        display_name: text(map, "displayName", context)?,
        description: text(map, "description", context)?,
        annotations: parse_annotations(map),
        query_parameters: parse_properties(field(map, "queryParameters"), context)?,
        headers: parse_headers(field(map, "headers"), context)?,
        query_string: parse_query_string(field(map, "queryString"), context)?,
        responses: parse_responses(field(map, "responses"), context)?,
        body: parse_body(field(map, "body"), context)?,
        protocols: parse_protocols(map)?,
        is: parse_trait_usages(field(map, "is"))?,
        secured_by: parse_secured_by(field(map, "securedBy"))?,
    })
}

/// Parse a `responses` block.
///
/// Keys that are not status codes are skipped.
pub(super) fn parse_responses(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<Response>>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let empty = Mapping::new();
    let map = as_mapping(value, "responses", &empty)?;

    let mut responses = Vec::with_capacity(map.len());
    for (key, value) in map {
        let Some(code) = status_code(key) else {
            trace!(key = ?key, "skipping non-status key in responses");
            continue;
        };
        responses.push(parse_response(code, value, context)?);
    }

    Ok(non_empty(responses))
}

fn status_code(key: &Value) -> Option<u16> {
    match key {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_response(code: u16, value: &Value, context: &FileContext) -> Result<Response> {
    let empty = Mapping::new();
    let map = as_mapping(value, &code.to_string(), &empty)?;

    Ok(Response {
        code,
        description: text(map, "description", context)?,
        annotations: parse_annotations(map),
        headers: parse_headers(field(map, "headers"), context)?,
        body: parse_body(field(map, "body"), context)?,
    })
}

/// Parse a request or response body.
///
/// Media-type keys become per-media-type variants; other keys describe the
/// body itself.
pub(super) fn parse_body(value: Option<&Value>, context: &FileContext) -> Result<Option<Body>> {
    let Some(value) = value else {
        return Ok(None);
    };

    inline_or_included(value, context, None, |value, context| match value {
        Value::Null => Ok(None),
        Value::String(expr) => Ok(Some(Body {
            data_type: Some(DataType::from_string(expr)),
            ..Default::default()
        })),
        Value::Mapping(map) => {
            let mut media_types = Vec::new();
            for (key, value) in map {
                let key = key_str(key, "Body")?;
                if MediaType::is_valid(key) {
                    media_types.push(parse_media_type_body(key, value, context)?);
                }
            }

            Ok(Some(Body {
                data_type: DataType::from_yaml(Some(value), Some("type"))?,
                properties: parse_properties(field(map, "properties"), context)?,
                examples: parse_examples(map, context)?,
                media_types: non_empty(media_types),
            }))
        }
        other => Err(invalid("body", "a mapping or type expression", other)),
    })
}

fn parse_media_type_body(
    identifier: &str,
    value: &Value,
    context: &FileContext,
) -> Result<MediaTypeBody> {
    inline_or_included(value, context, None, |value, context| match value {
        Value::Null => Ok(MediaTypeBody {
            identifier: identifier.to_string(),
            ..Default::default()
        }),
        Value::String(expr) => Ok(MediaTypeBody {
            identifier: identifier.to_string(),
            data_type: Some(DataType::from_string(expr)),
            ..Default::default()
        }),
        Value::Mapping(map) => Ok(MediaTypeBody {
            identifier: identifier.to_string(),
            data_type: DataType::from_yaml(Some(value), Some("type"))?,
            properties: parse_properties(field(map, "properties"), context)?,
            examples: parse_examples(map, context)?,
        }),
        other => Err(invalid(identifier, "a mapping or type expression", other)),
    })
}

/// Parse a `headers` block.
pub(super) fn parse_headers(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<Header>>> {
    declarations(value, context, "headers", "Header", |name, value, context| {
        let parameter = parse_parameter(name, value, context)?;
        Ok(Header {
            key: name.to_string(),
            data_type: parameter.data_type,
            display_name: parameter.display_name,
            description: parameter.description,
            required: parameter.required,
            pattern: parameter.pattern,
            enum_values: parameter.enum_values,
            default: parameter.default,
            examples: parameter.examples,
            annotations: parameter.annotations,
        })
    })
}

/// Parse a `uriParameters` or `baseUriParameters` block.
pub(super) fn parse_uri_parameters(
    value: Option<&Value>,
    context: &FileContext,
    key: &str,
) -> Result<Option<Vec<UriParameter>>> {
    declarations(value, context, key, "URI Parameter", |name, value, context| {
        let parameter = parse_parameter(name, value, context)?;
        Ok(UriParameter {
            name: name.to_string(),
            data_type: parameter.data_type,
            display_name: parameter.display_name,
            description: parameter.description,
            required: parameter.required,
            pattern: parameter.pattern,
            enum_values: parameter.enum_values,
            default: parameter.default,
            examples: parameter.examples,
            annotations: parameter.annotations,
        })
    })
}

/// Fields shared by headers and URI parameters.
struct Parameter {
    data_type: Option<DataType>,
    display_name: Option<String>,
    description: Option<String>,
    required: Option<bool>,
    pattern: Option<String>,
    enum_values: Option<Vec<String>>,
    default: Option<Value>,
    examples: Option<Vec<Example>>,
    annotations: Option<Vec<Annotation>>,
}

fn parse_parameter(name: &str, value: &Value, context: &FileContext) -> Result<Parameter> {
    inline_or_included(value, context, None, |value, context| {
        let data_type = match value {
            Value::String(expr) => Some(DataType::from_string(expr)),
            Value::Mapping(_) | Value::Null => DataType::from_yaml(Some(value), Some("type"))?,
            other => return Err(invalid(name, "a parameter declaration", other)),
        };

        let empty = Mapping::new();
        let map = match value {
            Value::Mapping(map) => map,
            _ => &empty,
        };

        Ok(Parameter {
            data_type,
            display_name: text(map, "displayName", context)?,
            description: text(map, "description", context)?,
            required: boolean(map, "required")?,
            pattern: string(map, "pattern")?,
            enum_values: string_list(map, "enum")?,
            default: field(map, "default").cloned(),
            examples: parse_examples(map, context)?,
            annotations: parse_annotations(map),
        })
    })
}

pub(super) fn parse_query_string(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<QueryString>> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value {
        Value::String(expr) => Ok(Some(QueryString {
            data_type: Some(DataType::from_string(expr)),
            ..Default::default()
        })),
        Value::Mapping(map) => Ok(Some(QueryString {
            data_type: DataType::from_yaml(Some(value), Some("type"))?,
            properties: parse_properties(field(map, "properties"), context)?,
            examples: parse_examples(map, context)?,
        })),
        other => Err(invalid("queryString", "a mapping or type expression", other)),
    }
}

/// Parse `protocols`, accepting any letter case.
pub(super) fn parse_protocols(map: &Mapping) -> Result<Option<Vec<Protocol>>> {
    let Some(names) = string_list(map, "protocols")? else {
        return Ok(None);
    };

    names
        .into_iter()
        .map(|name| {
            Protocol::parse(&name).ok_or(RamlError::InvalidValue {
                what: "protocol",
                value: name,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(non_empty)
}

/// Parse an `is` list.
pub(super) fn parse_trait_usages(value: Option<&Value>) -> Result<Option<Vec<TraitUsage>>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let items = match value {
        Value::Sequence(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };

    items
        .iter()
        .map(|item| usage(item, "is").map(|(name, parameters)| TraitUsage { name, parameters }))
        .collect::<Result<Vec<_>>>()
        .map(non_empty)
}
