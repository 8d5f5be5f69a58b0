#![deny(missing_docs)]

//! # Routes
//!
//! Walks the resolved document's `paths` table and builds one [`Endpoint`]
//! per (path, method) pair.
//!
//! Path-level `parameters` are inherited by every operation under the path.
//! Parameters are keyed by `(name, in)`; an operation-level declaration
//! replaces the inherited one in place.

use crate::oas::document::{get_object, get_str, scalar_to_string};
use crate::oas::models::{Endpoint, HttpMethod, Parameter, RequestBody, ResponseInfo};
use crate::oas::ref_utils::lookup_component;
use crate::oas::summary::summarize_schema;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

static NULL: Value = Value::Null;

/// Extracts endpoints from a resolved document.
///
/// Returns an empty list (with a diagnostic) when the document declares no paths.
pub fn extract_endpoints(document: &Value) -> Vec<Endpoint> {
    let paths = match get_object(document, "paths") {
        Some(paths) if !paths.is_empty() => paths,
        _ => {
            warn!("Spec has no paths defined; returning empty endpoint list");
            return Vec::new();
        }
    };

    let mut endpoints = Vec::new();

    for (path, path_item) in paths {
        let Some(item) = path_item.as_object() else {
            debug!("Skipping non-mapping path item: {}", path);
            continue;
        };
        parse_path_item(&mut endpoints, document, path, item);
    }

    endpoints
}

fn parse_path_item(
    endpoints: &mut Vec<Endpoint>,
    document: &Value,
    path: &str,
    item: &Map<String, Value>,
) {
    let path_params = param_list(item.get("parameters"));

    for (key, operation) in item {
        if key == "parameters" || !operation.is_object() {
            continue;
        }
        let Some(method) = HttpMethod::from_key(key) else {
            debug!("Skipping unsupported method '{}' on {}", key, path);
            continue;
        };

        let op_params = param_list(operation.get("parameters"));
        let parameters = merge_parameters(document, path_params, op_params)
            .into_iter()
            .map(extract_parameter)
            .collect();

        endpoints.push(Endpoint {
            method,
            path: path.to_string(),
            operation_id: get_str(operation, "operationId").map(str::to_string),
            summary: get_str(operation, "summary").map(str::to_string),
            description: get_str(operation, "description").map(str::to_string),
            tags: extract_tags(operation.get("tags")),
            parameters,
            request_body: operation
                .get("requestBody")
                .and_then(|body| extract_request_body(document, body)),
            responses: operation
                .get("responses")
                .and_then(Value::as_object)
                .map(|responses| extract_responses(document, responses))
                .unwrap_or_default(),
        });
    }
}

fn param_list(node: Option<&Value>) -> &[Value] {
    node.and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Merges path-level and operation-level parameter declarations.
///
/// Keyed by `(name, in)`: the first declaration fixes the position, a later
/// one with the same key replaces it. Entries without a string `name` and
/// `in` are dropped.
pub(crate) fn merge_parameters<'a>(
    document: &'a Value,
    path_params: &'a [Value],
    op_params: &'a [Value],
) -> Vec<&'a Value> {
    let mut merged: IndexMap<(&str, &str), &Value> = IndexMap::new();

    for raw in path_params.iter().chain(op_params) {
        let Some(param) = lookup_component(raw, document, "parameters") else {
            warn!("Unresolvable parameter reference: {}", raw);
            continue;
        };
        let (Some(name), Some(location)) = (
            param.get("name").and_then(Value::as_str),
            param.get("in").and_then(Value::as_str),
        ) else {
            debug!("Skipping parameter without name/in: {}", param);
            continue;
        };
        merged.insert((name, location), param);
    }

    merged.into_values().collect()
}

fn extract_parameter(param: &Value) -> Parameter {
    let schema = param.get("schema").filter(|s| s.is_object());
    let summary = summarize_schema(schema);

    Parameter {
        name: get_str(param, "name").unwrap_or_default().to_string(),
        location: get_str(param, "in").unwrap_or_default().to_string(),
        required: param
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        schema_type: if summary.is_empty() {
            "string".to_string()
        } else {
            summary
        },
        format: schema
            .and_then(|s| get_str(s, "format"))
            .map(str::to_string),
        enum_values: schema
            .and_then(|s| s.get("enum"))
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(scalar_to_string).collect())
            .unwrap_or_default(),
        example: param
            .get("example")
            .or_else(|| schema.and_then(|s| s.get("example")))
            .and_then(example_to_string),
        description: get_str(param, "description").map(str::to_string),
    }
}

fn example_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        scalar => scalar_to_string(scalar),
    }
}

fn extract_tags(node: Option<&Value>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in node.and_then(Value::as_array).into_iter().flatten() {
        if let Some(tag) = tag.as_str() {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

fn extract_request_body(document: &Value, body: &Value) -> Option<RequestBody> {
    let Some(body) = lookup_component(body, document, "requestBodies") else {
        warn!("Unresolvable request body reference: {}", body);
        return None;
    };
    let (content_type, media) = get_object(body, "content")?.iter().next()?;

    Some(RequestBody {
        content_type: content_type.clone(),
        schema_summary: summarize_schema(media.get("schema")),
        required: body
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    })
}

fn extract_responses(document: &Value, responses: &Map<String, Value>) -> Vec<ResponseInfo> {
    responses
        .iter()
        .map(|(status_code, raw)| {
            let response = lookup_component(raw, document, "responses").unwrap_or_else(|| {
                warn!("Unresolvable response reference for {}: {}", status_code, raw);
                &NULL
            });

            let schema_summary = get_object(response, "content")
                .and_then(|content| content.values().next())
                .map(|media| summarize_schema(media.get("schema")))
                .filter(|summary| !summary.is_empty());

            ResponseInfo {
                status_code: status_code.clone(),
                description: response
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                schema_summary,
            }
        })
        .collect()
}
