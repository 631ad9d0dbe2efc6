use std::fmt;

use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use crate::model::annotation::Annotation;
use crate::model::lookup::Keyed;
use crate::model::method::{Header, QueryString, Response};
use crate::model::types::Property;

/// The `type` of a security scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecuritySchemeType {
    OAuth1,
    OAuth2,
    Basic,
    Digest,
    PassThrough,
    /// `x-<name>` schemes.
    Custom(String),
}

impl SecuritySchemeType {
    /// Parse a scheme type as written in the document.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OAuth 1.0" => Some(Self::OAuth1),
            "OAuth 2.0" => Some(Self::OAuth2),
            "Basic Authentication" => Some(Self::Basic),
            "Digest Authentication" => Some(Self::Digest),
            "Pass Through" => Some(Self::PassThrough),
            custom if custom.starts_with("x-") && custom.len() > 2 => {
                Some(Self::Custom(custom.to_string()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SecuritySchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecuritySchemeType::OAuth1 => f.write_str("OAuth 1.0"),
            SecuritySchemeType::OAuth2 => f.write_str("OAuth 2.0"),
            SecuritySchemeType::Basic => f.write_str("Basic Authentication"),
            SecuritySchemeType::Digest => f.write_str("Digest Authentication"),
            SecuritySchemeType::PassThrough => f.write_str("Pass Through"),
            SecuritySchemeType::Custom(name) => f.write_str(name),
        }
    }
}

impl Serialize for SecuritySchemeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A declaration under `securitySchemes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    pub identifier: String,
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub described_by: Option<SecuritySchemeDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<SecuritySchemeSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

impl Keyed for SecurityScheme {
    type Key = str;

    fn key(&self) -> &str {
        &self.identifier
    }
}

/// The `describedBy` block: what the scheme adds to secured requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySchemeDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Header>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<Vec<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<QueryString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<Response>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

/// Scheme settings, shaped by the scheme type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySchemeSettings {
    OAuth1(OAuth1Settings),
    OAuth2(OAuth2Settings),
    /// Settings of schemes without a fixed shape, kept as written.
    Other(Mapping),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth1Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_token_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_credentials_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_grants: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

/// A `securedBy` entry. The identifier `null` means the resource may also be
/// accessed anonymously.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecuritySchemeUsage {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Mapping>,
}

impl SecuritySchemeUsage {
    /// Whether this entry is the anonymous `null` usage.
    pub fn is_anonymous(&self) -> bool {
        self.identifier == "null"
    }

    /// A parameter passed to the scheme.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.as_ref().and_then(|p| p.get(name))
    }
}

impl Keyed for SecuritySchemeUsage {
    type Key = str;

    fn key(&self) -> &str {
        &self.identifier
    }
}
