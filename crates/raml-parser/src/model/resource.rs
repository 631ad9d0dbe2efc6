use serde::Serialize;
use serde_yaml::Value;

use crate::datatype::DataType;
use crate::model::annotation::Annotation;
use crate::model::lookup::{find_by_key, Keyed};
use crate::model::method::{HttpMethod, Method};
use crate::model::security::SecuritySchemeUsage;
use crate::model::templates::{ResourceTypeUsage, TraitUsage};
use crate::model::types::Example;

/// A node of the resource tree. `path` is relative to the parent resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<Method>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is: Option<Vec<TraitUsage>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceTypeUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secured_by: Option<Vec<SecuritySchemeUsage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_parameters: Option<Vec<UriParameter>>,
}

impl Resource {
    /// This resource's path appended to its parent's absolute path.
    pub fn absolute_path(&self, parent: &str) -> String {
        format!("{}{}", parent.trim_end_matches('/'), self.path)
    }

    pub fn method_with_verb(&self, verb: HttpMethod) -> Option<&Method> {
        find_by_key(self.methods.iter().flatten(), &verb)
    }

    /// A direct child by its relative path.
    pub fn resource_with_path(&self, path: &str) -> Option<&Resource> {
        find_by_key(self.resources.iter().flatten(), path)
    }

    pub fn uri_parameter_named(&self, name: &str) -> Option<&UriParameter> {
        find_by_key(self.uri_parameters.iter().flatten(), name)
    }

    /// Names of the `{template}` segments in this resource's own path.
    pub fn path_parameter_names(&self) -> Vec<&str> {
        template_names(&self.path)
    }
}

impl Keyed for Resource {
    type Key = str;

    fn key(&self) -> &str {
        &self.path
    }
}

/// A declared `{name}` segment of a resource path or base URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UriParameter {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

impl Keyed for UriParameter {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }
}

/// Names between `{` and `}` in a URI template.
pub(crate) fn template_names(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty() {
            names.push(name);
        }
        rest = &after[end + 1..];
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_path_concatenates() {
        let resource = Resource {
            path: "/{id}".into(),
            ..Default::default()
        };
        assert_eq!(resource.absolute_path("/users"), "/users/{id}");
        assert_eq!(resource.absolute_path(""), "/{id}");
    }

    #[test]
    fn extracts_template_names() {
        assert_eq!(template_names("/users/{id}/posts/{postId}"), vec!["id", "postId"]);
        assert_eq!(template_names("https://api.example.com/{version}"), vec!["version"]);
        assert!(template_names("/plain").is_empty());
        assert!(template_names("/broken{").is_empty());
    }
}
