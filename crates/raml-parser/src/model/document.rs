use serde::Serialize;

use crate::model::annotation::{Annotation, AnnotationType};
use crate::model::body::MediaType;
use crate::model::library::Library;
use crate::model::lookup::{find_by_key, Keyed};
use crate::model::method::Protocol;
use crate::model::resource::{Resource, UriParameter};
use crate::model::security::{SecurityScheme, SecuritySchemeUsage};
use crate::model::templates::{ResourceType, TraitDefinition};
use crate::model::types::Type;

/// A parsed RAML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Raml {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_uri_parameters: Option<Vec<UriParameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<Protocol>>,
    /// Default media types for bodies that do not name their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_types: Option<Vec<MediaType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Vec<DocumentationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<Type>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<TraitDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<ResourceType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_types: Option<Vec<AnnotationType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<Vec<SecurityScheme>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secured_by: Option<Vec<SecuritySchemeUsage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<Vec<Library>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

impl Raml {
    pub fn type_named(&self, name: &str) -> Option<&Type> {
        find_by_key(self.types.iter().flatten(), name)
    }

    pub fn trait_named(&self, name: &str) -> Option<&TraitDefinition> {
        find_by_key(self.traits.iter().flatten(), name)
    }

    pub fn resource_type_with_identifier(&self, identifier: &str) -> Option<&ResourceType> {
        find_by_key(self.resource_types.iter().flatten(), identifier)
    }

    pub fn annotation_type_named(&self, name: &str) -> Option<&AnnotationType> {
        find_by_key(self.annotation_types.iter().flatten(), name)
    }

    pub fn security_scheme_with_identifier(&self, identifier: &str) -> Option<&SecurityScheme> {
        find_by_key(self.security_schemes.iter().flatten(), identifier)
    }

    pub fn library_with_identifier(&self, identifier: &str) -> Option<&Library> {
        find_by_key(self.uses.iter().flatten(), identifier)
    }

    /// A top-level resource by its path.
    pub fn resource_with_path(&self, path: &str) -> Option<&Resource> {
        find_by_key(self.resources.iter().flatten(), path)
    }

    pub fn documentation_titled(&self, title: &str) -> Option<&DocumentationEntry> {
        find_by_key(self.documentation.iter().flatten(), title)
    }

    /// Every resource in pre-order, paired with its absolute path.
    pub fn resources_depth_first(&self) -> Vec<(String, &Resource)> {
        let mut visited = Vec::new();
        let mut stack: Vec<(String, &Resource)> = self
            .resources
            .iter()
            .flatten()
            .rev()
            .map(|r| (r.absolute_path(""), r))
            .collect();

        while let Some((path, resource)) = stack.pop() {
            for child in resource.resources.iter().flatten().rev() {
                stack.push((child.absolute_path(&path), child));
            }
            visited.push((path, resource));
        }

        visited
    }
}

/// A `documentation` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentationEntry {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

impl Keyed for DocumentationEntry {
    type Key = str;

    fn key(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(path: &str, children: Vec<Resource>) -> Resource {
        Resource {
            path: path.to_string(),
            resources: (!children.is_empty()).then_some(children),
            ..Default::default()
        }
    }

    #[test]
    fn depth_first_visits_each_resource_once() {
        let raml = Raml {
            title: "Blog".into(),
            resources: Some(vec![
                resource(
                    "/users",
                    vec![resource("/{id}", vec![resource("/posts", vec![])])],
                ),
                resource("/health", vec![]),
            ]),
            ..Default::default()
        };

        let paths: Vec<String> = raml
            .resources_depth_first()
            .into_iter()
            .map(|(path, _)| path)
            .collect();

        assert_eq!(
            paths,
            vec!["/users", "/users/{id}", "/users/{id}/posts", "/health"]
        );
    }
}
