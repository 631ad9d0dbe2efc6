//! Traits, resource types, and references to them.
//!
//! Usages capture the template name and the parameters passed to it. The
//! `<<parameter>>` placeholders inside a template are kept verbatim.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::model::annotation::Annotation;
use crate::model::body::Body;
use crate::model::lookup::{find_by_key, Keyed};
use crate::model::method::{Header, HttpMethod, Method, Protocol, QueryString, Response};
use crate::model::resource::UriParameter;
use crate::model::security::SecuritySchemeUsage;
use crate::model::types::Property;

/// A declaration under `traits`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Header>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<Vec<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<QueryString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<Response>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<Protocol>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secured_by: Option<Vec<SecuritySchemeUsage>>,
}

impl Keyed for TraitDefinition {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }
}

/// A declaration under `resourceTypes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<Method>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_parameters: Option<Vec<UriParameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is: Option<Vec<TraitUsage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secured_by: Option<Vec<SecuritySchemeUsage>>,
}

impl ResourceType {
    pub fn method_with_verb(&self, verb: HttpMethod) -> Option<&Method> {
        find_by_key(self.methods.iter().flatten(), &verb)
    }
}

impl Keyed for ResourceType {
    type Key = str;

    fn key(&self) -> &str {
        &self.identifier
    }
}

/// An `is` entry on a resource or method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraitUsage {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Mapping>,
}

impl TraitUsage {
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.as_ref().and_then(|p| p.get(name))
    }
}

impl Keyed for TraitUsage {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }
}

/// The `type` of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceTypeUsage {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Mapping>,
}

impl ResourceTypeUsage {
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.as_ref().and_then(|p| p.get(name))
    }
}
