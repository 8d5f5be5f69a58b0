#![deny(missing_docs)]

//! # Anthropic Messages API
//!
//! - **wire**: Request body and reply decoding.
//! - **stream**: Server-sent event draining for streamed replies.
//! - **client**: The blocking HTTP client (feature `client`).

#[cfg(feature = "client")]
pub mod client;
pub mod stream;
pub mod wire;

#[cfg(feature = "client")]
pub use client::AnthropicClient;

/// Service root used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
