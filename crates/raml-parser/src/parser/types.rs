//! Types, properties, scalar restrictions and examples.

use serde_yaml::{Mapping, Value};

use crate::datatype::{DataType, ScalarType};
use crate::error::{RamlError, Result};
use crate::include::{self, FileContext};
use crate::model::{
    Example, FileRestrictions, NumberFormat, NumberRestrictions, Property, PropertyRestrictions,
    StringRestrictions, Type,
};

use super::annotations::parse_annotations;
use super::yaml::{
    boolean, field, invalid, key_str, non_empty, number, string, string_list, text, unsigned,
};
use super::{declarations, inline_or_included};

/// Parse a `types` block.
pub(super) fn parse_types(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<Type>>> {
    declarations(value, context, "types", "Type", parse_type)
}

/// Parse one type declaration. The value may be a type expression, a
/// mapping of facets, or an include of either.
pub(super) fn parse_type(name: &str, value: &Value, context: &FileContext) -> Result<Type> {
    inline_or_included(value, context, None, |value, context| match value {
        Value::Null => Ok(Type {
            name: name.to_string(),
            ..Default::default()
        }),
        Value::String(expr) => Ok(Type {
            name: name.to_string(),
            data_type: Some(DataType::from_string(expr)),
            ..Default::default()
        }),
        Value::Mapping(map) => {
            let items = DataType::from_yaml(field(map, "items"), Some("type"))?;
            let data_type = match (DataType::from_yaml(Some(value), Some("type"))?, &items) {
                (Some(DataType::Custom(base)), Some(items)) if base == "array" => {
                    Some(DataType::Array(Box::new(items.clone())))
                }
                (data_type, _) => data_type,
            };
            let restrictions = parse_restrictions(map, data_type.as_ref())?;

            Ok(Type {
                name: name.to_string(),
                display_name: text(map, "displayName", context)?,
                description: text(map, "description", context)?,
                default: field(map, "default").cloned(),
                enum_values: string_list(map, "enum")?,
                properties: parse_properties(field(map, "properties"), context)?,
                min_properties: unsigned(map, "minProperties")?,
                max_properties: unsigned(map, "maxProperties")?,
                additional_properties: boolean(map, "additionalProperties")?,
                discriminator: string(map, "discriminator")?,
                discriminator_value: string(map, "discriminatorValue")?,
                items,
                min_items: unsigned(map, "minItems")?,
                max_items: unsigned(map, "maxItems")?,
                unique_items: boolean(map, "uniqueItems")?,
                restrictions,
                facets: parse_properties(field(map, "facets"), context)?,
                examples: parse_examples(map, context)?,
                annotations: parse_annotations(map),
                data_type,
            })
        }
        other => Err(invalid(name, "a type declaration", other)),
    })
}

/// Parse a `properties` (or `queryParameters`, `facets`) block.
pub(super) fn parse_properties(
    value: Option<&Value>,
    context: &FileContext,
) -> Result<Option<Vec<Property>>> {
    declarations(value, context, "properties", "Property", parse_property)
}

fn parse_property(name: &str, value: &Value, context: &FileContext) -> Result<Property> {
    inline_or_included(value, context, None, |value, context| match value {
        Value::Null => Ok(Property {
            name: name.to_string(),
            ..Default::default()
        }),
        Value::String(expr) => Ok(Property {
            name: name.to_string(),
            data_type: Some(DataType::from_string(expr)),
            ..Default::default()
        }),
        Value::Mapping(map) => {
            let data_type = DataType::from_yaml(Some(value), Some("type"))?;
            Ok(Property {
                name: name.to_string(),
                required: boolean(map, "required")?,
                restrictions: parse_restrictions(map, data_type.as_ref())?,
                display_name: text(map, "displayName", context)?,
                description: text(map, "description", context)?,
                default: field(map, "default").cloned(),
                enum_values: string_list(map, "enum")?,
                examples: parse_examples(map, context)?,
                annotations: parse_annotations(map),
                data_type,
            })
        }
        other => Err(invalid(name, "a property declaration", other)),
    })
}

/// Scalar facets, shaped by the declared scalar kind.
///
/// Without a declared type, string facets are read since `string` is the
/// implied type. Returns `None` when no facet is present.
pub(super) fn parse_restrictions(
    map: &Mapping,
    data_type: Option<&DataType>,
) -> Result<Option<PropertyRestrictions>> {
    let kind = match data_type {
        None => Some(ScalarType::String),
        Some(data_type) => data_type.scalar(),
    };

    let restrictions = match kind {
        Some(ScalarType::String) => {
            let restrictions = StringRestrictions {
                pattern: string(map, "pattern")?,
                min_length: unsigned(map, "minLength")?,
                max_length: unsigned(map, "maxLength")?,
            };
            (restrictions != StringRestrictions::default())
                .then_some(PropertyRestrictions::String(restrictions))
        }
        Some(ScalarType::Number | ScalarType::Integer) => {
            let format = match string(map, "format")? {
                None => None,
                Some(format) => Some(NumberFormat::parse(&format).ok_or(
                    RamlError::InvalidValue {
                        what: "number format",
                        value: format,
                    },
                )?),
            };
            let restrictions = NumberRestrictions {
                minimum: number(map, "minimum")?,
                maximum: number(map, "maximum")?,
                format,
                multiple_of: number(map, "multipleOf")?,
            };
            (restrictions != NumberRestrictions::default())
                .then_some(PropertyRestrictions::Number(restrictions))
        }
        Some(ScalarType::File) => {
            let restrictions = FileRestrictions {
                file_types: string_list(map, "fileTypes")?,
                min_length: unsigned(map, "minLength")?,
                max_length: unsigned(map, "maxLength")?,
            };
            (restrictions != FileRestrictions::default())
                .then_some(PropertyRestrictions::File(restrictions))
        }
        _ => None,
    };

    Ok(restrictions)
}

/// Read `example` and `examples` from a node.
pub(super) fn parse_examples(map: &Mapping, context: &FileContext) -> Result<Option<Vec<Example>>> {
    let mut examples = Vec::new();

    if let Some(value) = field(map, "example") {
        examples.push(parse_example("example", value, context)?);
    }

    match field(map, "examples") {
        None => {}
        Some(Value::Mapping(named)) => {
            for (name, value) in named {
                let name = key_str(name, "Example")?;
                examples.push(parse_example(name, value, context)?);
            }
        }
        Some(other) => return Err(invalid("examples", "a mapping", other)),
    }

    Ok(non_empty(examples))
}

/// An example is either the bare value or a mapping with a `value` key and
/// its own metadata. An included example is read as text.
fn parse_example(identifier: &str, value: &Value, context: &FileContext) -> Result<Example> {
    if include::is_include(value) {
        return Ok(Example {
            identifier: identifier.to_string(),
            value: Some(Value::String(include::read_text(value, context)?)),
            ..Default::default()
        });
    }

    match value {
        Value::Mapping(map) if map.contains_key("value") => Ok(Example {
            identifier: identifier.to_string(),
            display_name: text(map, "displayName", context)?,
            description: text(map, "description", context)?,
            value: field(map, "value").cloned(),
            strict: boolean(map, "strict")?,
            annotations: parse_annotations(map),
        }),
        value => Ok(Example {
            identifier: identifier.to_string(),
            value: (!value.is_null()).then(|| value.clone()),
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use std::fs;
    use tempfile::TempDir;

    fn detached() -> FileContext {
        FileContext::detached(ParseOptions::default())
    }

    fn types(yaml: &str) -> Vec<Type> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        parse_types(Some(&value), &detached()).unwrap().unwrap()
    }

    #[test]
    fn parses_object_type() {
        let types = types(
            r#"
Person:
  type: object
  discriminator: kind
  additionalProperties: false
  properties:
    name:
      type: string
      minLength: 1
    age?: integer
    tags: string[]
"#,
        );

        let person = &types[0];
        assert_eq!(person.name, "Person");
        assert_eq!(person.data_type, Some(DataType::Object));
        assert_eq!(person.discriminator.as_deref(), Some("kind"));
        assert_eq!(person.additional_properties, Some(false));

        let name = person.property_named("name").unwrap();
        assert_eq!(
            name.restrictions,
            Some(PropertyRestrictions::String(StringRestrictions {
                min_length: Some(1),
                ..Default::default()
            }))
        );

        let age = person.property_named("age?").unwrap();
        assert_eq!(age.data_type, Some(DataType::Scalar(ScalarType::Integer)));
        assert_eq!(age.required, None);

        let tags = person.property_named("tags").unwrap();
        assert_eq!(
            tags.data_type,
            Some(DataType::Array(Box::new(DataType::Scalar(ScalarType::String))))
        );
    }

    #[test]
    fn parses_shorthand_and_array_types() {
        let types = types(
            r#"
Id: string
Pets:
  type: array
  items: Pet
  minItems: 1
  uniqueItems: true
Anything:
"#,
        );

        assert_eq!(types[0].data_type, Some(DataType::Scalar(ScalarType::String)));
        assert_eq!(
            types[1].data_type,
            Some(DataType::Array(Box::new(DataType::Custom("Pet".into()))))
        );
        assert_eq!(types[1].items, Some(DataType::Custom("Pet".into())));
        assert_eq!(types[1].min_items, Some(1));
        assert_eq!(types[1].unique_items, Some(true));
        assert_eq!(types[2].data_type, None);
    }

    #[test]
    fn number_restrictions_and_format() {
        let types = types(
            r#"
Age:
  type: integer
  minimum: 0
  maximum: 150
  format: int8
"#,
        );
        assert_eq!(
            types[0].restrictions,
            Some(PropertyRestrictions::Number(NumberRestrictions {
                minimum: Some(0.0),
                maximum: Some(150.0),
                format: Some(NumberFormat::Int8),
                multiple_of: None,
            }))
        );
    }

    #[test]
    fn unknown_number_format_is_rejected() {
        let value: Value = serde_yaml::from_str("Age:\n  type: number\n  format: huge\n").unwrap();
        let err = parse_types(Some(&value), &detached()).unwrap_err();
        assert!(matches!(err, RamlError::InvalidValue { what: "number format", .. }));
    }

    #[test]
    fn file_restrictions() {
        let types = types(
            r#"
Avatar:
  type: file
  fileTypes: [image/png, image/jpeg]
  maxLength: 1048576
"#,
        );
        assert_eq!(
            types[0].restrictions,
            Some(PropertyRestrictions::File(FileRestrictions {
                file_types: Some(vec!["image/png".into(), "image/jpeg".into()]),
                min_length: None,
                max_length: Some(1048576),
            }))
        );
    }

    #[test]
    fn non_string_property_key_is_rejected() {
        let value: Value = serde_yaml::from_str("T:\n  properties:\n    1: string\n").unwrap();
        let err = parse_types(Some(&value), &detached()).unwrap_err();
        assert_eq!(err.to_string(), "E2012: Property Key must be a String");
    }

    #[test]
    fn single_and_named_examples() {
        let map: Mapping = serde_yaml::from_str(
            r#"
example: { name: Ada }
examples:
  first:
    displayName: First
    strict: false
    value: { name: Grace }
  second: 42
"#,
        )
        .unwrap();

        let examples = parse_examples(&map, &detached()).unwrap().unwrap();
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].identifier, "example");
        assert_eq!(examples[1].identifier, "first");
        assert_eq!(examples[1].strict, Some(false));
        assert_eq!(examples[1].display_name.as_deref(), Some("First"));
        assert!(examples[1].value.as_ref().unwrap().get("name").is_some());
        assert_eq!(examples[2].value, Some(Value::Number(42.into())));
    }

    #[test]
    fn type_can_be_included() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("person.raml"),
            "#%RAML 1.0 DataType\ntype: object\nproperties:\n  name: string\n",
        )
        .unwrap();

        let context = FileContext::for_file(dir.path().join("api.raml"), ParseOptions::default());
        let value: Value = serde_yaml::from_str("Person: !include person.raml\n").unwrap();
        let types = parse_types(Some(&value), &context).unwrap().unwrap();

        assert_eq!(types[0].name, "Person");
        assert_eq!(types[0].data_type, Some(DataType::Object));
        assert!(types[0].property_named("name").is_some());
    }
}
