#![deny(missing_docs)]

//! # Generation Module
//!
//! - **client**: The remote generation call contract.
//! - **retry**: Failure classification and bounded backoff around one call.
//! - **orchestrator**: Sequencing over all endpoints with partial-failure tolerance.
//! - **pricing**: Per-model rates and cost estimates.

pub mod client;
pub mod orchestrator;
pub mod pricing;
pub mod retry;

use serde::Serialize;

pub use client::{Completion, GenerationClient, GenerationRequest, TokenUsage, CREDENTIAL_ENV};
pub use orchestrator::{progress_label, Generator, GeneratorConfig, DEFAULT_MODEL};
pub use pricing::{
    estimate_cost, estimate_tokens, format_cost, preflight_estimate, CostEstimate, ModelPricing,
    PricingTable,
};
pub use retry::{RetryPolicy, RetryingCaller, Sleeper, ThreadSleeper};

/// Generated documentation for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDoc {
    /// `METHOD path`, e.g. "GET /users".
    pub endpoint_ref: String,
    /// Generated Markdown.
    pub markdown: String,
    /// Input plus output tokens for this endpoint.
    pub tokens_used: u64,
    /// Model that produced it.
    pub model: String,
}

/// Outcome of a full generation run.
///
/// Endpoints whose generation failed are absent from `docs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    /// Title of the source specification.
    pub api_title: String,
    /// Version of the source specification.
    pub api_version: String,
    /// Generated docs in endpoint order.
    pub docs: Vec<GeneratedDoc>,
    /// Input plus output tokens over all successful calls.
    pub total_tokens: u64,
    /// Estimated USD cost of those tokens.
    pub total_cost_usd: f64,
    /// Model identifier used for the run.
    pub model: String,
}
