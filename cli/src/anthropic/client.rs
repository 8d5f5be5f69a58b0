#![deny(missing_docs)]

//! # HTTP Client
//!
//! Blocking [`GenerationClient`] over `ureq`.

use apidoc_core::generation::{Completion, GenerationClient, GenerationRequest};
use apidoc_core::ApiError;
use std::io::BufReader;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

use crate::anthropic::stream::read_event_stream;
use crate::anthropic::wire::{error_from_response, parse_message, MessagesBody, API_VERSION};

/// Callback receiving streamed text as it arrives.
pub type DeltaSink = Box<dyn Fn(&str)>;

/// HTTP client for `POST {base_url}/v1/messages`.
pub struct AnthropicClient {
    agent: Agent,
    api_key: String,
    endpoint: String,
    on_delta: Option<DeltaSink>,
}

impl AnthropicClient {
    /// Creates a client for the given credential and service root.
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(600)))
            .build();

        Self {
            agent: Agent::new_with_config(config),
            api_key: api_key.into(),
            endpoint: format!("{}/v1/messages", base_url.trim_end_matches('/')),
            on_delta: None,
        }
    }

    /// Echoes streamed text deltas to `sink`.
    pub fn with_delta_sink(mut self, sink: DeltaSink) -> Self {
        self.on_delta = Some(sink);
        self
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn transport(err: impl std::fmt::Display) -> ApiError {
    ApiError::Transport(err.to_string())
}

impl GenerationClient for AnthropicClient {
    fn complete(&self, request: &GenerationRequest) -> Result<Completion, ApiError> {
        debug!(
            "POST {} (model {}, stream {})",
            self.endpoint, request.model, request.stream
        );

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .send_json(MessagesBody::from(request))
            .map_err(transport)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response
                .body_mut()
                .read_to_string()
                .unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        if !request.stream {
            let body: serde_json::Value = response.body_mut().read_json().map_err(transport)?;
            return parse_message(&body);
        }

        let reader = BufReader::new(response.body_mut().as_reader());
        let completion = match &self.on_delta {
            Some(sink) => {
                let completion = read_event_stream(reader, |text| sink(text))?;
                sink("\n");
                completion
            }
            None => read_event_stream(reader, |_| {})?,
        };
        Ok(completion)
    }
}
