#![deny(missing_docs)]

//! # Document Decoding
//!
//! Decodes raw JSON or YAML text into the untyped document tree walked by the
//! resolver, summarizer and extractor.
//!
//! The tree is a `serde_json::Value` built with `preserve_order`, so mapping
//! iteration follows declaration order for both input formats. YAML input is
//! first decoded into `serde_yaml::Value` and then converted, because YAML
//! allows non-string mapping keys (`200:` is an integer key).

use crate::error::FormatCause;
use serde_json::{Map, Number, Value};
use std::path::Path;
use tracing::warn;

/// The on-disk encodings accepted for an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file extension (case-insensitive).
    ///
    /// Returns the `UnsupportedExtension` cause for anything else, including
    /// a missing extension.
    pub fn from_path(path: &Path) -> Result<Self, FormatCause> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "" => Err(FormatCause::UnsupportedExtension(String::new())),
            other => Err(FormatCause::UnsupportedExtension(format!(".{}", other))),
        }
    }
}

/// Decodes `content` into a document tree whose root is a mapping.
pub fn decode_document(content: &str, format: DocumentFormat) -> Result<Value, FormatCause> {
    let value = match format {
        DocumentFormat::Json => serde_json::from_str::<Value>(content).map_err(FormatCause::Json)?,
        DocumentFormat::Yaml => {
            let yaml = serde_yaml::from_str::<serde_yaml::Value>(content)
                .map_err(FormatCause::Yaml)?;
            yaml_to_json(yaml)
        }
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(FormatCause::NotAMapping)
    }
}

/// Converts a YAML tree into the JSON-shaped document tree.
///
/// - Scalar keys are stringified (`200` -> `"200"`, `true` -> `"true"`).
/// - Tagged values are unwrapped.
/// - Non-finite floats become `null`.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, v) in mapping {
                match yaml_key(&key) {
                    Some(k) => {
                        map.insert(k, yaml_to_json(v));
                    }
                    None => warn!("Dropping non-scalar mapping key: {:?}", key),
                }
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(&tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
    }
}

/// Renders a scalar node as text.
///
/// Strings are returned as-is, numbers and booleans are stringified; `null`,
/// sequences and mappings yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Looks up `key` in a mapping node and returns it as a non-empty string.
pub(crate) fn get_str<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Looks up `key` in a mapping node and returns the nested mapping, if it is one.
pub(crate) fn get_object<'a>(node: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    node.get(key).and_then(Value::as_object)
}
