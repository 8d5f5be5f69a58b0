#![deny(missing_docs)]

//! # Generation Client
//!
//! The contract for a single call to the remote text-generation service.
//!
//! Abstracted to allow scripted clients in tests without network access; the
//! CLI provides the HTTP implementation.

use crate::error::ApiError;
use std::ops::{Add, AddAssign};

/// Environment variable holding the service credential.
pub const CREDENTIAL_ENV: &str = "ANTHROPIC_API_KEY";

/// One request to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Model identifier, e.g. "claude-sonnet-4-6".
    pub model: String,
    /// System instruction.
    pub system: String,
    /// The single user message.
    pub user: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Whether the response should be streamed.
    pub stream: bool,
}

/// Token counts reported for a call (or accumulated over several).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Prompt tokens.
    pub input_tokens: u64,
    /// Generated tokens.
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Creates a usage record.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Input plus output tokens.
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage {
            input_tokens: self.input_tokens + rhs.input_tokens,
            output_tokens: self.output_tokens + rhs.output_tokens,
        }
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: TokenUsage) {
        *self = *self + rhs;
    }
}

/// A successful, fully drained response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Generated text.
    pub text: String,
    /// Token counts for this call.
    pub usage: TokenUsage,
}

/// Interface for executing one generation call.
///
/// Implementations make exactly one attempt; retrying is the caller's job.
pub trait GenerationClient {
    /// Sends `request` and returns the complete response.
    fn complete(&self, request: &GenerationRequest) -> Result<Completion, ApiError>;
}

impl<T: GenerationClient + ?Sized> GenerationClient for &T {
    fn complete(&self, request: &GenerationRequest) -> Result<Completion, ApiError> {
        (**self).complete(request)
    }
}

impl<T: GenerationClient + ?Sized> GenerationClient for Box<T> {
    fn complete(&self, request: &GenerationRequest) -> Result<Completion, ApiError> {
        (**self).complete(request)
    }
}
