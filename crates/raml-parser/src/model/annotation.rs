use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::model::lookup::Keyed;
use crate::model::types::Property;

/// An annotation applied to a node with a `(name): value` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotation {
    /// The annotation name without parentheses.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Annotation {
    /// The value when it is a single scalar.
    pub fn single_value(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    /// The value when it is a mapping of parameters.
    pub fn parameters(&self) -> Option<&Mapping> {
        self.value.as_ref().and_then(Value::as_mapping)
    }
}

impl Keyed for Annotation {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }
}

/// The value shape an annotation type accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationTypeKind {
    /// No value.
    Nil,
    /// A single string.
    String,
    /// A mapping described by the type's properties.
    Properties,
    /// Any one of several shapes.
    Multiple(Vec<AnnotationTypeKind>),
}

impl AnnotationTypeKind {
    /// Parse a single shape name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "nil" => Some(Self::Nil),
            "string" => Some(Self::String),
            "object" | "properties" => Some(Self::Properties),
            _ => None,
        }
    }
}

/// A declaration under `annotationTypes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationType {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AnnotationTypeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_targets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

impl Keyed for AnnotationType {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }
}
