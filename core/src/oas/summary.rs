#![deny(missing_docs)]

//! # Schema Summaries
//!
//! Renders a (resolved) schema node into a short, human-readable type string
//! such as `array of { id: integer, name: string }`.
//!
//! The summary is lossy and bounded: object nesting stops at
//! [`MAX_SUMMARY_DEPTH`] with a literal `...`.

use serde_json::Value;

/// Object nesting level at which summaries collapse to `...`.
pub const MAX_SUMMARY_DEPTH: usize = 3;

/// Summarizes an optional schema node starting at depth 0.
///
/// Never fails: missing or non-mapping schemas summarize to an empty string.
pub fn summarize_schema(schema: Option<&Value>) -> String {
    summarize_at(schema, 0)
}

/// Returns the declared `type` of a schema.
///
/// For list-valued types (`type: [string, "null"]`) the first non-`null`
/// entry is used.
pub(crate) fn declared_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

fn is_object_shaped(schema: &Value, ty: Option<&str>) -> bool {
    ty == Some("object") || schema.get("properties").is_some()
}

fn summarize_at(schema: Option<&Value>, depth: usize) -> String {
    let Some(schema) = schema.filter(|s| s.is_object()) else {
        return String::new();
    };
    let ty = declared_type(schema);

    if ty == Some("array") {
        return match schema.get("items").filter(|items| !is_empty_node(items)) {
            Some(items) => format!("array of {}", summarize_at(Some(items), depth)),
            None => "array".to_string(),
        };
    }

    if is_object_shaped(schema, ty) {
        if depth >= MAX_SUMMARY_DEPTH {
            return "...".to_string();
        }
        let props = match schema.get("properties").and_then(Value::as_object) {
            Some(props) if !props.is_empty() => props,
            _ => return "object".to_string(),
        };

        let fields: Vec<String> = props
            .iter()
            .map(|(field, field_schema)| {
                // Fields without a declared type are treated as objects.
                let field_ty = declared_type(field_schema).unwrap_or("object");
                if is_object_shaped(field_schema, Some(field_ty)) {
                    format!("{}: {}", field, summarize_at(Some(field_schema), depth + 1))
                } else {
                    format!("{}: {}", field, field_ty)
                }
            })
            .collect();

        return format!("{{ {} }}", fields.join(", "));
    }

    ty.map(str::to_string).unwrap_or_default()
}

fn is_empty_node(node: &Value) -> bool {
    match node {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(_) => false,
    }
}
