use serde_yaml::{Mapping, Value};

use crate::error::{NodeKind, RamlError, Result};
use crate::include::FileContext;
use crate::model::{Annotation, AnnotationType, AnnotationTypeKind};

use super::types::parse_properties;
use super::yaml::{annotation_name, field, invalid, non_empty, string_list, text};
use super::declarations;

/// Collect the `(name): value` entries of a node.
pub(super) fn parse_annotations(map: &Mapping) -> Option<Vec<Annotation>> {
    let annotations = map
        .iter()
        .filter_map(|(key, value)| {
            let name = annotation_name(key.as_str()?)?;
            Some(Annotation {
                name: name.to_string(),
                value: (!value.is_null()).then(|| value.clone()),
            })
        })
        .collect();
    non_empty(annotations)
}

/// Parse an `annotationTypes` block.
pub(super) fn parse_annotation_types(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<AnnotationType>>> {
    declarations(value, context, "annotationTypes", "Annotation Type", |name, value, context| {
        parse_annotation_type(name, value, context)
            .map_err(RamlError::failed(NodeKind::AnnotationType, name))
    })
}

fn parse_annotation_type(
    name: &str,
    value: &Value,
    context: &FileContext,
) -> Result<AnnotationType> {
    let declared = |kind| AnnotationType {
        name: name.to_string(),
        kind,
        display_name: None,
        description: None,
        properties: None,
        allowed_targets: None,
        annotations: None,
    };

    match value {
        Value::Null => Ok(declared(AnnotationTypeKind::Nil)),
        Value::String(expr) => Ok(declared(parse_kind_expression(expr)?)),
        Value::Sequence(members) => Ok(declared(parse_kind_sequence(members)?)),
        Value::Mapping(map) => {
            let properties = parse_properties(field(map, "properties"), context)?;
            let kind = match field(map, "type") {
                Some(Value::String(expr)) => parse_kind_expression(expr)?,
                Some(Value::Sequence(members)) => parse_kind_sequence(members)?,
                Some(other) => return Err(invalid("type", "an annotation type expression", other)),
                None if properties.is_some() => AnnotationTypeKind::Properties,
                None => AnnotationTypeKind::String,
            };

            Ok(AnnotationType {
                name: name.to_string(),
                kind,
                display_name: text(map, "displayName", context)?,
                description: text(map, "description", context)?,
                properties,
                allowed_targets: string_list(map, "allowedTargets")?,
                annotations: parse_annotations(map),
            })
        }
        other => Err(invalid(name, "an annotation type declaration", other)),
    }
}

/// `nil`, `string`, `object`, or a `|` separated choice of those.
fn parse_kind_expression(expr: &str) -> Result<AnnotationTypeKind> {
    let members: Vec<&str> = expr.split('|').map(str::trim).collect();
    if let [single] = members.as_slice() {
        return parse_kind(single);
    }
    members
        .into_iter()
        .map(parse_kind)
        .collect::<Result<Vec<_>>>()
        .map(AnnotationTypeKind::Multiple)
}

fn parse_kind_sequence(members: &[Value]) -> Result<AnnotationTypeKind> {
    members
        .iter()
        .map(|member| match member {
            Value::String(s) => parse_kind(s),
            other => Err(invalid("type", "an annotation type name", other)),
        })
        .collect::<Result<Vec<_>>>()
        .map(AnnotationTypeKind::Multiple)
}

fn parse_kind(name: &str) -> Result<AnnotationTypeKind> {
    AnnotationTypeKind::parse(name).ok_or_else(|| RamlError::InvalidValue {
        what: "annotation type",
        value: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;

    fn parse(yaml: &str) -> Result<Option<Vec<AnnotationType>>> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        parse_annotation_types(Some(&value), &FileContext::detached(ParseOptions::default()))
    }

    #[test]
    fn collects_parenthesized_keys() {
        let map: Mapping = serde_yaml::from_str(
            r#"
description: Users
(deprecated):
(owner): team-a
(meta):
  since: 2
"#,
        )
        .unwrap();

        let annotations = parse_annotations(&map).unwrap();
        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[0].name, "deprecated");
        assert_eq!(annotations[0].value, None);
        assert_eq!(annotations[1].single_value(), Some("team-a"));
        assert!(annotations[2].parameters().unwrap().contains_key("since"));
    }

    #[test]
    fn no_annotations_is_none() {
        let map: Mapping = serde_yaml::from_str("description: x\n").unwrap();
        assert!(parse_annotations(&map).is_none());
    }

    #[test]
    fn annotation_type_shapes() {
        let types = parse(
            r#"
deprecated: nil
owner: string
flag:
meta:
  displayName: Metadata
  allowedTargets: [Resource, Method]
  properties:
    since: integer
choice: string | nil
"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(types[0].kind, AnnotationTypeKind::Nil);
        assert_eq!(types[1].kind, AnnotationTypeKind::String);
        assert_eq!(types[2].kind, AnnotationTypeKind::Nil);
        assert_eq!(types[3].kind, AnnotationTypeKind::Properties);
        assert_eq!(types[3].display_name.as_deref(), Some("Metadata"));
        assert_eq!(
            types[3].allowed_targets,
            Some(vec!["Resource".to_string(), "Method".to_string()])
        );
        assert_eq!(types[3].properties.as_ref().unwrap()[0].name, "since");
        assert_eq!(
            types[4].kind,
            AnnotationTypeKind::Multiple(vec![AnnotationTypeKind::String, AnnotationTypeKind::Nil])
        );
    }

    #[test]
    fn unknown_kind_names_the_annotation_type() {
        let err = parse("broken: Person\n").unwrap_err();
        assert!(matches!(
            err,
            RamlError::FailedToParse { kind: NodeKind::AnnotationType, ref name, .. } if name == "broken"
        ));
        assert!(matches!(
            err.root_cause(),
            RamlError::InvalidValue {
                what: "annotation type",
                ..
            }
        ));
    }
}
