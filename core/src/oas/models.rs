#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Canonical records produced by the loader.
//!
//! These structs are built once from the resolved document and then handed,
//! unchanged, to prompt construction and generation.

use serde::Serialize;
use std::fmt;

/// The HTTP methods an endpoint can be documented for.
///
/// Other verbs in the source document (`head`, `options`, `trace`, ...) are
/// filtered out while walking the path table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Maps a path-item key (`get`, `post`, ...) to a method.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized API description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specification {
    /// `info.title`, or "Unknown".
    pub title: String,
    /// `info.version`, or "Unknown".
    pub version: String,
    /// `info.description`.
    pub description: Option<String>,
    /// URL of the first declared server.
    pub base_url: Option<String>,
    /// Endpoints in document order.
    pub endpoints: Vec<Endpoint>,
}

/// One documented (path, method) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    /// HTTP Method.
    pub method: HttpMethod,
    /// The URL path template, e.g. "/users/{id}".
    pub path: String,
    /// `operationId`.
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Tags associated with the operation (deduplicated).
    pub tags: Vec<String>,
    /// Merged path-level and operation-level parameters.
    pub parameters: Vec<Parameter>,
    /// Request body, if the operation declares content for one.
    pub request_body: Option<RequestBody>,
    /// One entry per declared status code.
    pub responses: Vec<ResponseInfo>,
}

impl Endpoint {
    /// Reference string used in progress output and rendered docs, e.g. `GET /users`.
    pub fn reference(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A parameter in a route (path, query, header or cookie).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name in the source (e.g. "id").
    pub name: String,
    /// The `in` value, carried through verbatim.
    pub location: String,
    /// Whether the parameter must be supplied.
    pub required: bool,
    /// Summarized schema type; "string" when nothing is declared.
    pub schema_type: String,
    /// Schema `format` (e.g. "uuid", "int64").
    pub format: Option<String>,
    /// Allowed values from the schema `enum`.
    pub enum_values: Vec<String>,
    /// Example value, from the parameter or its schema.
    pub example: Option<String>,
    /// Human description.
    pub description: Option<String>,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            required: false,
            schema_type: "string".to_string(),
            format: None,
            enum_values: Vec::new(),
            example: None,
            description: None,
        }
    }
}

/// Request body details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    /// The first declared media type.
    pub content_type: String,
    /// Summary of the media type's schema.
    pub schema_summary: String,
    /// `required` flag (defaults to true).
    pub required: bool,
}

impl Default for RequestBody {
    fn default() -> Self {
        Self {
            content_type: "application/json".to_string(),
            schema_summary: String::new(),
            required: true,
        }
    }
}

/// A single declared response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseInfo {
    /// Status code as written, e.g. "200" or "default".
    pub status_code: String,
    /// Response description.
    pub description: String,
    /// Summary of the first media type's schema, if non-empty.
    pub schema_summary: Option<String>,
}
