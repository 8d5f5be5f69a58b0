#![deny(missing_docs)]

//! # Messages Wire Format
//!
//! Request bodies and response decoding for the `/v1/messages` endpoint.

use apidoc_core::generation::{Completion, GenerationRequest, TokenUsage};
use apidoc_core::ApiError;
use serde::Serialize;
use serde_json::Value;

/// Value of the `anthropic-version` header.
pub const API_VERSION: &str = "2023-06-01";

/// One chat turn.
#[derive(Debug, Serialize)]
pub struct Message<'a> {
    /// Always `user` for this tool.
    pub role: &'static str,
    /// Prompt text.
    pub content: &'a str,
}

/// JSON body of a messages request.
#[derive(Debug, Serialize)]
pub struct MessagesBody<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// Generation cap.
    pub max_tokens: u32,
    /// System instruction.
    pub system: &'a str,
    /// Conversation, a single user turn.
    pub messages: [Message<'a>; 1],
    /// Whether the reply is sent as server-sent events.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl<'a> From<&'a GenerationRequest> for MessagesBody<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: [Message {
                role: "user",
                content: &request.user,
            }],
            stream: request.stream,
        }
    }
}

/// Reads `usage.{input,output}_tokens` from a node carrying a `usage` mapping.
pub(crate) fn usage_of(node: &Value) -> Option<TokenUsage> {
    let usage = node.get("usage")?;
    let count = |key: &str| usage.get(key).and_then(Value::as_u64);
    Some(TokenUsage::new(
        count("input_tokens").unwrap_or(0),
        count("output_tokens").unwrap_or(0),
    ))
}

/// Decodes a non-streamed message reply.
///
/// Text blocks are concatenated in order; other block kinds are skipped.
pub fn parse_message(body: &Value) -> Result<Completion, ApiError> {
    let blocks = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Transport("response has no content blocks".to_string()))?;

    let text = blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<String>();

    Ok(Completion {
        text,
        usage: usage_of(body).unwrap_or_default(),
    })
}

/// Builds the error for a non-2xx reply.
///
/// The message is `error.message` when the body is JSON, otherwise the raw body.
pub fn error_from_response(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());
    ApiError::from_status(status, message)
}

/// Maps an `error.type` reported inside an event stream to the matching kind.
pub fn error_from_type(kind: &str, message: impl Into<String>) -> ApiError {
    let status = match kind {
        "invalid_request_error" => 400,
        "authentication_error" => 401,
        "permission_error" => 403,
        "not_found_error" => 404,
        "request_too_large" => 413,
        "rate_limit_error" => 429,
        "overloaded_error" => 529,
        _ => 500,
    };
    ApiError::from_status(status, message)
}
