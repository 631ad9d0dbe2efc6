use serde::Serialize;

use crate::model::annotation::AnnotationType;
use crate::model::lookup::{find_by_key, Keyed};
use crate::model::security::SecurityScheme;
use crate::model::templates::{ResourceType, TraitDefinition};
use crate::model::types::Type;

/// A library imported through `uses`. Libraries may import further libraries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// The namespace the library is imported under.
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<Type>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<ResourceType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<TraitDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<Vec<SecurityScheme>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_types: Option<Vec<AnnotationType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<Vec<Library>>,
}

impl Library {
    pub fn type_named(&self, name: &str) -> Option<&Type> {
        find_by_key(self.types.iter().flatten(), name)
    }

    pub fn trait_named(&self, name: &str) -> Option<&TraitDefinition> {
        find_by_key(self.traits.iter().flatten(), name)
    }

    pub fn resource_type_with_identifier(&self, identifier: &str) -> Option<&ResourceType> {
        find_by_key(self.resource_types.iter().flatten(), identifier)
    }

    pub fn security_scheme_with_identifier(&self, identifier: &str) -> Option<&SecurityScheme> {
        find_by_key(self.security_schemes.iter().flatten(), identifier)
    }

    pub fn library_with_identifier(&self, identifier: &str) -> Option<&Library> {
        find_by_key(self.uses.iter().flatten(), identifier)
    }
}

impl Keyed for Library {
    type Key = str;

    fn key(&self) -> &str {
        &self.identifier
    }
}
