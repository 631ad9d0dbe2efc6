//! Typed accessors over `serde_yaml` values.
//!
//! A key holding null is treated the same as a missing key.

use serde_yaml::{Mapping, Value};

use crate::error::{RamlError, Result};
use crate::include::{self, FileContext};

/// Name of a value's YAML kind, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// The non-null value stored under `key`.
pub(crate) fn field<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

/// The mapping stored under `key`.
pub(crate) fn mapping<'a>(map: &'a Mapping, key: &str) -> Result<Option<&'a Mapping>> {
    match field(map, key) {
        None => Ok(None),
        Some(Value::Mapping(inner)) => Ok(Some(inner)),
        Some(other) => Err(invalid(key, "a mapping", other)),
    }
}

/// A mapping node, with null standing in for an empty mapping.
pub(crate) fn as_mapping<'a>(
    value: &'a Value,
    key: &str,
    empty: &'a Mapping,
) -> Result<&'a Mapping> {
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(empty),
        other => Err(invalid(key, "a mapping", other)),
    }
}

/// A scalar under `key`, rendered as a string.
pub(crate) fn string(map: &Mapping, key: &str) -> Result<Option<String>> {
    match field(map, key) {
        None => Ok(None),
        Some(value) => scalar_string(value)
            .map(Some)
            .ok_or_else(|| invalid(key, "a string", value)),
    }
}

/// Like [`string`], but a `!include` value is replaced with the text of the file.
pub(crate) fn text(map: &Mapping, key: &str, context: &FileContext) -> Result<Option<String>> {
    match field(map, key) {
        Some(value) if include::is_include(value) => include::read_text(value, context).map(Some),
        _ => string(map, key),
    }
}

/// A required string under `key`.
pub(crate) fn required_string(map: &Mapping, key: &str, context: &str) -> Result<String> {
    string(map, key)?.ok_or_else(|| RamlError::MissingKey {
        key: key.to_string(),
        context: context.to_string(),
    })
}

pub(crate) fn boolean(map: &Mapping, key: &str) -> Result<Option<bool>> {
    match field(map, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(invalid(key, "a boolean", other)),
    }
}

pub(crate) fn unsigned(map: &Mapping, key: &str) -> Result<Option<u64>> {
    match field(map, key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| invalid(key, "a non-negative integer", value)),
    }
}

pub(crate) fn number(map: &Mapping, key: &str) -> Result<Option<f64>> {
    match field(map, key) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(key, "a number", value)),
    }
}

/// A single string or a sequence of strings under `key`.
pub(crate) fn string_list(map: &Mapping, key: &str) -> Result<Option<Vec<String>>> {
    match field(map, key) {
        None => Ok(None),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| scalar_string(item).ok_or_else(|| invalid(key, "a list of strings", item)))
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(value) => scalar_string(value)
            .map(|s| Some(vec![s]))
            .ok_or_else(|| invalid(key, "a string or list of strings", value)),
    }
}

/// Strings, numbers and booleans rendered as text.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A mapping key that must be a string.
pub(crate) fn key_str<'a>(key: &'a Value, construct: &'static str) -> Result<&'a str> {
    key.as_str().ok_or(RamlError::InvalidKey(construct))
}

/// `(name)` keys carry annotations; returns the name without parentheses.
pub(crate) fn annotation_name(key: &str) -> Option<&str> {
    key.strip_prefix('(')
        .and_then(|k| k.strip_suffix(')'))
        .filter(|name| !name.is_empty())
}

pub(crate) fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

pub(crate) fn invalid(key: &str, expected: &'static str, found: &Value) -> RamlError {
    RamlError::InvalidType {
        key: key.to_string(),
        expected,
        found: kind_of(found),
    }
}
