#![deny(missing_docs)]

//! # Event Stream Reader
//!
//! Drains a `text/event-stream` messages reply into a [`Completion`].
//!
//! Only `data:` lines matter: every payload carries its own `type`, so the
//! `event:` line is redundant and ignored together with ids and comments.

use crate::anthropic::wire::{error_from_type, usage_of};
use apidoc_core::generation::{Completion, TokenUsage};
use apidoc_core::ApiError;
use serde_json::Value;
use std::io::BufRead;
use tracing::debug;

/// Running state of one streamed reply.
#[derive(Debug, Default)]
struct StreamState {
    text: String,
    usage: TokenUsage,
    started: bool,
}

impl StreamState {
    fn apply(&mut self, data: &str, on_delta: &mut impl FnMut(&str)) -> Result<(), ApiError> {
        let event: Value = serde_json::from_str(data)
            .map_err(|e| ApiError::Transport(format!("malformed stream event: {}", e)))?;

        match event.get("type").and_then(Value::as_str) {
            Some("message_start") => {
                self.started = true;
                if let Some(usage) = event.get("message").and_then(usage_of) {
                    self.usage = usage;
                }
            }
            Some("content_block_delta") => {
                let delta = &event["delta"];
                if delta.get("type").and_then(Value::as_str) == Some("text_delta") {
                    if let Some(text) = delta.get("text").and_then(Value::as_str) {
                        on_delta(text);
                        self.text.push_str(text);
                    }
                }
            }
            Some("message_delta") => {
                // Counts here are cumulative for the message.
                let usage = &event["usage"];
                if let Some(output) = usage.get("output_tokens").and_then(Value::as_u64) {
                    self.usage.output_tokens = output;
                }
                if let Some(input) = usage.get("input_tokens").and_then(Value::as_u64) {
                    self.usage.input_tokens = input;
                }
            }
            Some("error") => {
                let error = &event["error"];
                let kind = error.get("type").and_then(Value::as_str).unwrap_or_default();
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                return Err(error_from_type(kind, message));
            }
            other => debug!("Ignoring stream event {:?}", other),
        }
        Ok(())
    }
}

/// Reads the whole event stream, echoing each text delta to `on_delta`.
///
/// Usage is only final once the stream ends, so nothing is returned early.
pub fn read_event_stream<R: BufRead>(
    reader: R,
    mut on_delta: impl FnMut(&str),
) -> Result<Completion, ApiError> {
    let mut state = StreamState::default();
    let mut data = String::new();

    for line in reader.lines() {
        let line = line.map_err(|e| ApiError::Transport(e.to_string()))?;

        if line.is_empty() {
            if !data.is_empty() {
                state.apply(&data, &mut on_delta)?;
                data.clear();
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if !data.is_empty() {
        state.apply(&data, &mut on_delta)?;
    }

    if !state.started {
        return Err(ApiError::Transport(
            "event stream ended before message_start".to_string(),
        ));
    }

    Ok(Completion {
        text: state.text,
        usage: state.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const HAPPY_STREAM: &str = "event: message_start
data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_1\",\"usage\":{\"input_tokens\":310,\"output_tokens\":1}}}

event: content_block_start
data: {\"type\":\"content_block_start\",\"index\":0,\"content_block\":{\"type\":\"text\",\"text\":\"\"}}

event: ping
data: {\"type\": \"ping\"}

event: content_block_delta
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hello\"}}

event: content_block_delta
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\" world\"}}

event: content_block_stop
data: {\"type\":\"content_block_stop\",\"index\":0}

event: message_delta
data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":42}}

event: message_stop
data: {\"type\":\"message_stop\"}

";

    #[test]
    fn test_drains_text_and_usage() {
        let mut echoed = Vec::new();
        let completion =
            read_event_stream(Cursor::new(HAPPY_STREAM), |t| echoed.push(t.to_string())).unwrap();

        assert_eq!(echoed, vec!["Hello", " world"]);
        assert_eq!(completion.text, "Hello world");
        assert_eq!(completion.usage, TokenUsage::new(310, 42));
    }

    #[test]
    fn test_final_event_without_trailing_blank_line() {
        let stream = "data: {\"type\":\"message_start\",\"message\":{\"usage\":{\"input_tokens\":5}}}\n\n\
                      data: {\"type\":\"message_delta\",\"usage\":{\"output_tokens\":7}}";
        let completion = read_event_stream(Cursor::new(stream), |_| {}).unwrap();
        assert_eq!(completion.usage, TokenUsage::new(5, 7));
        assert_eq!(completion.text, "");
    }

    #[test]
    fn test_error_event_is_classified() {
        let stream = "event: message_start
data: {\"type\":\"message_start\",\"message\":{\"usage\":{\"input_tokens\":5,\"output_tokens\":0}}}

event: error
data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}

";
        let err = read_event_stream(Cursor::new(stream), |_| {}).unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 529,
                message: "Overloaded".into()
            }
        );
    }

    #[test]
    fn test_truncated_stream_is_transport_error() {
        let err = read_event_stream(Cursor::new(": keep-alive\n\n"), |_| {}).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));

        let err = read_event_stream(Cursor::new("data: {not json\n\n"), |_| {}).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
