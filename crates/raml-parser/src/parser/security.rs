use serde_yaml::{Mapping, Value};

use crate::error::{NodeKind, RamlError, Result};
use crate::include::{FileContext, FragmentKind};
use crate::model::{
    OAuth1Settings, OAuth2Settings, SecurityScheme, SecuritySchemeDescription,
    SecuritySchemeSettings, SecuritySchemeType, SecuritySchemeUsage,
};

use super::annotations::parse_annotations;
use super::http::{parse_headers, parse_query_string, parse_responses};
use super::types::parse_properties;
use super::yaml::{
    as_mapping, field, mapping, non_empty, required_string, string, string_list, text,
};
use super::{declarations, inline_or_included, usage};

/// The identifier recorded for a `null` entry in `securedBy`.
const ANONYMOUS: &str = "null";

/// Parse a `securitySchemes` block.
pub(super) fn parse_security_schemes(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<SecurityScheme>>> {
    declarations(value, context, "securitySchemes", "Security Scheme", |name, value, context| {
        inline_or_included(value, context, Some(FragmentKind::SecurityScheme), |value, context| {
            parse_security_scheme(name, value, context)
        })
        .map_err(RamlError::failed(NodeKind::SecurityScheme, name))
    })
}

fn parse_security_scheme(
    identifier: &str,
    value: &Value,
    context: &FileContext,
) -> Result<SecurityScheme> {
    let empty = Mapping::new();
    let map = as_mapping(value, identifier, &empty)?;

    let type_name = required_string(map, "type", "security scheme")?;
    let scheme_type =
        SecuritySchemeType::parse(&type_name).ok_or(RamlError::InvalidValue {
            what: "security scheme type",
            value: type_name,
        })?;

    let settings = match mapping(map, "settings")? {
        None => None,
        Some(settings) => Some(parse_settings(&scheme_type, settings)?),
    };

    Ok(SecurityScheme {
        identifier: identifier.to_string(),
        display_name: text(map, "displayName", context)?,
        description: text(map, "description", context)?,
        described_by: parse_description(field(map, "describedBy"), context)?,
        settings,
        annotations: parse_annotations(map),
        scheme_type,
    })
}

fn parse_description(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<SecuritySchemeDescription>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let empty = Mapping::new();
    let map = as_mapping(value, "describedBy", &empty)?;

    Ok(Some(SecuritySchemeDescription {
        headers: parse_headers(field(map, "headers"), context)?,
        query_parameters: parse_properties(field(map, "queryParameters"), context)?,
        query_string: parse_query_string(field(map, "queryString"), context)?,
        responses: parse_responses(field(map, "responses"), context)?,
        annotations: parse_annotations(map),
    }))
}

fn parse_settings(
    scheme_type: &SecuritySchemeType,
    map: &Mapping,
) -> Result<SecuritySchemeSettings> {
    let settings = match scheme_type {
        SecuritySchemeType::OAuth1 => SecuritySchemeSettings::OAuth1(OAuth1Settings {
            request_token_uri: string(map, "requestTokenUri")?,
            authorization_uri: string(map, "authorizationUri")?,
            token_credentials_uri: string(map, "tokenCredentialsUri")?,
            signatures: string_list(map, "signatures")?,
        }),
        SecuritySchemeType::OAuth2 => SecuritySchemeSettings::OAuth2(OAuth2Settings {
            authorization_uri: string(map, "authorizationUri")?,
            access_token_uri: string(map, "accessTokenUri")?,
            authorization_grants: string_list(map, "authorizationGrants")?,
            scopes: string_list(map, "scopes")?,
        }),
        _ => SecuritySchemeSettings::Other(map.clone()),
    };
    Ok(settings)
}

/// Parse a `securedBy` list. A `null` entry marks anonymous access.
pub(super) fn parse_secured_by(value: Option<&Value>) -> Result<Option<Vec<SecuritySchemeUsage>>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let items = match value {
        Value::Sequence(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };

    items
        .iter()
        .map(|item| match item {
            Value::Null => Ok(SecuritySchemeUsage {
                identifier: ANONYMOUS.to_string(),
                parameters: None,
            }),
            item => usage(item, "securedBy").map(|(identifier, parameters)| SecuritySchemeUsage {
                identifier,
                parameters,
            }),
        })
        .collect::<Result<Vec<_>>>()
        .map(non_empty)
}
