//! Text fix-ups applied before YAML parsing.
//!
//! Two line-oriented passes run over the raw document:
//! - a key written with no value and no nested block below it is recorded as a
//!   [`KeyPath`], and the parsed tree carries an explicit null at that path;
//! - a value shaped like `digits,digits` is quoted so the reader keeps it as text.
//!
//! Nothing is inserted into the text for the first pass, so there is no marker
//! that could collide with real content. The YAML reader already yields null
//! for a bare `key:`; restoring the recorded paths only makes that explicit.
//!
//! Block scalars and open flow collections are copied through untouched,
//! including those that start on a sequence-item line.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde_yaml::Value;
use tracing::trace;

use crate::error::Result;
use crate::options::ParseOptions;

/// Mapping keys from the document root down to an empty-valued key.
pub type KeyPath = Vec<String>;

/// The outcome of the text pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preprocessed {
    /// Text handed to the YAML reader.
    pub text: String,
    /// Keys that were written without a value.
    pub empty_keys: Vec<KeyPath>,
    /// Number of decimal-looking values that were quoted.
    pub quoted_decimals: usize,
}

/// `key:` or `key: value`, capturing indentation, key and value.
fn key_line() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)([^\s#][^#]*?):(?:\s+(.*?))?\s*$").ok())
        .as_ref()
}

/// `key: 1,5` style values.
fn decimal_value() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*[^\s#\-][^#]*?:\s+)(\d+,\d+)\s*$").ok())
        .as_ref()
}

/// Run both fix-ups over `text`.
///
/// When a pattern fails to compile the matching fix-up is skipped and the
/// text passes through untouched.
pub fn preprocess(text: &str) -> Preprocessed {
    let lines: Vec<&str> = text.lines().collect();
    let mut output: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
    let mut empty_keys = Vec::new();
    let mut quoted_decimals = 0;

    // Enclosing keys by indentation; `None` marks a sequence item.
    let mut stack: Vec<(usize, Option<String>)> = Vec::new();
    let mut block_indent: Option<usize> = None;

    for (index, line) in lines.iter().enumerate() {
        if is_blank_or_comment(line) {
            output.push(Cow::Borrowed(line));
            continue;
        }

        let indent = indentation(line);
        if let Some(block) = block_indent {
            if indent > block {
                output.push(Cow::Borrowed(line));
                continue;
            }
            block_indent = None;
        }

        while stack.last().is_some_and(|(level, _)| *level >= indent) {
            stack.pop();
        }

        let trimmed = line.trim_start();
        if is_sequence_item(trimmed) {
            stack.push((indent, None));
            let item = trimmed[1..].trim_start();
            if opens_block(item) {
                block_indent = Some(indent);
            } else if let Some(captures) = key_line().and_then(|re| re.captures(item)) {
                // Keys inside the item sit at the item's content column.
                let column = line.len() - item.len();
                let key = unquote(captures.get(2).map_or("", |m| m.as_str())).to_string();
                if opens_block(captures.get(3).map_or("", |m| m.as_str())) {
                    block_indent = Some(column);
                }
                stack.push((column, Some(key)));
            }
            output.push(Cow::Borrowed(line));
            continue;
        }

        let Some(captures) = key_line().and_then(|re| re.captures(line)) else {
            output.push(Cow::Borrowed(line));
            continue;
        };

        let key = unquote(captures.get(2).map_or("", |m| m.as_str())).to_string();
        let value = captures.get(3).map_or("", |m| m.as_str());
        let value = if value.starts_with('#') { "" } else { value };

        if value.is_empty() {
            let tracked = stack.iter().all(|(_, key)| key.is_some());
            if tracked && !has_nested_block(&lines, index, indent) {
                let mut path: KeyPath = stack.iter().filter_map(|(_, key)| key.clone()).collect();
                path.push(key.clone());
                empty_keys.push(path);
            }
        } else if opens_block(value) {
            block_indent = Some(indent);
        }

        stack.push((indent, Some(key)));
        output.push(quote_decimal(line, &mut quoted_decimals));
    }

    let mut normalized = output.join("\n");
    if text.ends_with('\n') {
        normalized.push('\n');
    }

    Preprocessed {
        text: normalized,
        empty_keys,
        quoted_decimals,
    }
}

/// Set every recorded empty key in `value` to an explicit null.
///
/// Paths that no longer resolve to a mapping entry are ignored.
pub fn restore_empty_values(value: &mut Value, empty_keys: &[KeyPath]) {
    for path in empty_keys {
        if let Some(slot) = lookup_mut(value, path) {
            *slot = Value::Null;
        }
    }
}

/// Parse `text` into a YAML tree, applying the fix-ups when enabled.
pub fn parse_yaml(text: &str, options: &ParseOptions) -> Result<Value> {
    if text.lines().all(is_blank_or_comment) {
        return Ok(Value::Null);
    }

    if !options.preprocess {
        return Ok(serde_yaml::from_str(text)?);
    }

    let preprocessed = preprocess(text);
    trace!(
        empty_keys = preprocessed.empty_keys.len(),
        quoted_decimals = preprocessed.quoted_decimals,
        "preprocessed document text"
    );

    let mut value: Value = serde_yaml::from_str(&preprocessed.text)?;
    restore_empty_values(&mut value, &preprocessed.empty_keys);
    Ok(value)
}

fn lookup_mut<'a>(value: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in path {
        let Value::Mapping(map) = current else {
            return None;
        };
        current = map
            .iter_mut()
            .find(|(key, _)| key_matches(key, segment))
            .map(|(_, value)| value)?;
    }
    Some(current)
}

fn key_matches(key: &Value, segment: &str) -> bool {
    match key {
        Value::String(s) => s == segment,
        Value::Number(n) => n.to_string() == segment,
        Value::Bool(b) => b.to_string() == segment,
        _ => false,
    }
}

fn quote_decimal<'a>(line: &'a str, quoted: &mut usize) -> Cow<'a, str> {
    match decimal_value() {
        Some(re) if re.is_match(line) => {
            *quoted += 1;
            re.replace(line, "${1}\"${2}\"")
        }
        _ => Cow::Borrowed(line),
    }
}

/// Whether the first content line after `index` belongs to the key at `index`.
fn has_nested_block(lines: &[&str], index: usize, indent: usize) -> bool {
    let Some(next) = lines[index + 1..]
        .iter()
        .find(|line| !is_blank_or_comment(line))
    else {
        return false;
    };

    let next_indent = indentation(next);
    next_indent > indent || (next_indent == indent && is_sequence_item(next.trim_start()))
}

/// Block scalars (`|`, `>-`) and flow collections left open on the key line.
fn opens_block(value: &str) -> bool {
    let value = value.split(" #").next().unwrap_or(value).trim_end();
    if let Some(rest) = value.strip_prefix('|').or_else(|| value.strip_prefix('>')) {
        return rest.chars().all(|c| c == '+' || c == '-' || c.is_ascii_digit());
    }
    (value.starts_with('[') && !value.ends_with(']'))
        || (value.starts_with('{') && !value.ends_with('}'))
}

fn is_sequence_item(trimmed: &str) -> bool {
    trimmed == "-" || trimmed.starts_with("- ")
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn unquote(key: &str) -> &str {
    let key = key.trim();
    key.strip_prefix('"')
        .and_then(|k| k.strip_suffix('"'))
        .or_else(|| key.strip_prefix('\'').and_then(|k| k.strip_suffix('\'')))
        .unwrap_or(key)
}
