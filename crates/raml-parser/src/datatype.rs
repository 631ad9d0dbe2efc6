//! Type expressions.
//!
//! A [`DataType`] is the parsed form of strings such as `object`, `string[]`,
//! `Person | Company` or `(A | B)[]`. Equality is structural and ordered, so
//! `A | B` and `B | A` are different types.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_yaml::Value;

use crate::error::{RamlError, Result};
use crate::parser::yaml::kind_of;

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Number,
    Boolean,
    String,
    DateOnly,
    TimeOnly,
    DateTimeOnly,
    DateTime,
    File,
    Integer,
    Nil,
}

impl ScalarType {
    /// All scalar types, in declaration order.
    pub const ALL: [ScalarType; 10] = [
        ScalarType::Number,
        ScalarType::Boolean,
        ScalarType::String,
        ScalarType::DateOnly,
        ScalarType::TimeOnly,
        ScalarType::DateTimeOnly,
        ScalarType::DateTime,
        ScalarType::File,
        ScalarType::Integer,
        ScalarType::Nil,
    ];

    /// The name used in type expressions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Number => "number",
            ScalarType::Boolean => "boolean",
            ScalarType::String => "string",
            ScalarType::DateOnly => "date-only",
            ScalarType::TimeOnly => "time-only",
            ScalarType::DateTimeOnly => "datetime-only",
            ScalarType::DateTime => "datetime",
            ScalarType::File => "file",
            ScalarType::Integer => "integer",
            ScalarType::Nil => "nil",
        }
    }

    /// Parse a scalar type name.
    ///
    /// Accepts both the hyphenated spelling (`date-only`) and the camel-case
    /// spelling (`dateOnly`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::String),
            "date-only" | "dateOnly" => Some(Self::DateOnly),
            "time-only" | "timeOnly" => Some(Self::TimeOnly),
            "datetime-only" | "dateTimeOnly" => Some(Self::DateTimeOnly),
            "datetime" | "dateTime" => Some(Self::DateTime),
            "file" => Some(Self::File),
            "integer" => Some(Self::Integer),
            "nil" => Some(Self::Nil),
            _ => None,
        }
    }
}

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `any`.
    Any,
    /// `object`.
    Object,
    /// `T[]`.
    Array(Box<DataType>),
    /// `A | B | ...`, members in declaration order.
    Union(Vec<DataType>),
    /// A built-in scalar.
    Scalar(ScalarType),
    /// A reference to a named type.
    Custom(String),
}

impl DataType {
    /// Parse a type expression. Unrecognized names become [`DataType::Custom`].
    pub fn from_string(s: &str) -> DataType {
        let s = s.trim();

        if s == "object" {
            return DataType::Object;
        }
        if let Some(element) = s.strip_suffix("[]") {
            return DataType::Array(Box::new(DataType::from_string(element)));
        }
        if s == "any" {
            return DataType::Any;
        }
        if let Some(scalar) = ScalarType::parse(s) {
            return DataType::Scalar(scalar);
        }
        if s.contains('|') {
            let stripped: String = s
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
                .collect();
            return DataType::Union(
                stripped
                    .split('|')
                    .filter(|member| !member.is_empty())
                    .map(DataType::from_string)
                    .collect(),
            );
        }

        DataType::Custom(s.to_string())
    }

    /// Read a type from a YAML value.
    ///
    /// A mapping is searched for `key` and the lookup repeats on its value, so
    /// inline declarations such as `type: { type: string }` resolve. Null or a
    /// missing key yields no type.
    pub fn from_yaml(value: Option<&Value>, key: Option<&str>) -> Result<Option<DataType>> {
        let Some(value) = value else {
            return Ok(None);
        };

        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(DataType::from_string(s))),
            Value::Mapping(map) => match key {
                Some(key) => DataType::from_yaml(map.get(key), Some(key)),
                None => Ok(None),
            },
            Value::Tagged(tagged) => Err(RamlError::Internal(format!(
                "unexpected tag {} in type expression",
                tagged.tag
            ))),
            other => Err(RamlError::InvalidType {
                key: key.unwrap_or("type").to_string(),
                expected: "a type expression",
                found: kind_of(other),
            }),
        }
    }

    /// The scalar kind, if this is a scalar.
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            DataType::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Any => f.write_str("any"),
            DataType::Object => f.write_str("object"),
            DataType::Array(inner) => match inner.as_ref() {
                DataType::Union(_) => write!(f, "({})[]", inner),
                _ => write!(f, "{}[]", inner),
            },
            DataType::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            DataType::Scalar(kind) => f.write_str(kind.as_str()),
            DataType::Custom(name) => f.write_str(name),
        }
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(name: &str) -> DataType {
        DataType::Custom(name.to_string())
    }

    #[test]
    fn object_keyword() {
        assert_eq!(DataType::from_string("object"), DataType::Object);
    }

    #[test]
    fn array_of_scalar() {
        assert_eq!(
            DataType::from_string("string[]"),
            DataType::Array(Box::new(DataType::Scalar(ScalarType::String)))
        );
    }

    #[test]
    fn multi_dimensional_array() {
        assert_eq!(
            DataType::from_string("integer[][]"),
            DataType::Array(Box::new(DataType::Array(Box::new(DataType::Scalar(
                ScalarType::Integer
            )))))
        );
    }

    #[test]
    fn union_of_custom_types() {
        assert_eq!(
            DataType::from_string("A|B"),
            DataType::Union(vec![custom("A"), custom("B")])
        );
    }

    #[test]
    fn array_of_union() {
        assert_eq!(
            DataType::from_string("(A|B)[]"),
            DataType::Array(Box::new(DataType::Union(vec![custom("A"), custom("B")])))
        );
    }

    #[test]
    fn spaces_and_parentheses_do_not_change_structure() {
        let expected = DataType::from_string("(A|B)[]");
        assert_eq!(DataType::from_string("( A | B )[]"), expected);
        assert_eq!(DataType::from_string("A | B"), DataType::from_string("A|B"));
        assert_eq!(
            DataType::from_string("(string | Person)"),
            DataType::Union(vec![DataType::Scalar(ScalarType::String), custom("Person")])
        );
    }

    #[test]
    fn union_equality_is_ordered() {
        let a = DataType::Union(vec![DataType::Scalar(ScalarType::String), custom("Person")]);
        let b = DataType::Union(vec![custom("Person"), DataType::Scalar(ScalarType::String)]);
        assert_ne!(a, b);
        assert_eq!(a, DataType::from_string("string | Person"));
    }

    #[test]
    fn scalar_vocabulary() {
        for scalar in ScalarType::ALL {
            assert_eq!(DataType::from_string(scalar.as_str()), DataType::Scalar(scalar));
        }
        assert_eq!(
            DataType::from_string("dateOnly"),
            DataType::Scalar(ScalarType::DateOnly)
        );
        assert_eq!(DataType::from_string("any"), DataType::Any);
    }

    #[test]
    fn unknown_names_are_custom() {
        assert_eq!(DataType::from_string("Person"), custom("Person"));
    }

    #[test]
    fn from_yaml_shapes() {
        let mapping: Value = serde_yaml::from_str("type: { type: \"string[]\" }").unwrap();
        assert_eq!(
            DataType::from_yaml(Some(&mapping), Some("type")).unwrap(),
            Some(DataType::from_string("string[]"))
        );

        assert_eq!(DataType::from_yaml(None, Some("type")).unwrap(), None);
        assert_eq!(DataType::from_yaml(Some(&Value::Null), None).unwrap(), None);

        let number = Value::Number(5.into());
        let err = DataType::from_yaml(Some(&number), Some("type")).unwrap_err();
        assert!(matches!(err, RamlError::InvalidType { found: "number", .. }));
    }

    #[test]
    fn display_round_trips_structure() {
        for expr in ["object", "string[]", "A | B", "(A | B)[]", "Person", "any"] {
            let parsed = DataType::from_string(expr);
            assert_eq!(parsed.to_string(), expr);
            assert_eq!(DataType::from_string(&parsed.to_string()), parsed);
        }
    }
}
