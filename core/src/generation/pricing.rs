#![deny(missing_docs)]

//! # Pricing
//!
//! Static per-model rates and the cost arithmetic built on them.
//! Rates are USD per million tokens.

use crate::error::{AppError, AppResult};
use crate::oas::models::Specification;
use crate::prompts::{build_endpoint_prompt, build_overview_prompt};
use indexmap::IndexMap;
use serde::Serialize;

/// Assumed output size of one endpoint document, for preflight estimates.
pub const ESTIMATED_ENDPOINT_OUTPUT_TOKENS: u64 = 800;

/// Assumed output size of the overview section, for preflight estimates.
pub const ESTIMATED_OVERVIEW_OUTPUT_TOKENS: u64 = 500;

/// Input and output rates for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPricing {
    /// USD per million input tokens.
    pub input: f64,
    /// USD per million output tokens.
    pub output: f64,
}

impl ModelPricing {
    /// Creates a rate pair.
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Computes the cost of a token count at the given rates.
pub fn estimate_cost(input_tokens: u64, output_tokens: u64, pricing: &ModelPricing) -> f64 {
    (input_tokens as f64 * pricing.input + output_tokens as f64 * pricing.output) / 1_000_000.0
}

/// Model identifier to rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingTable {
    models: IndexMap<String, ModelPricing>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::empty()
            .with_model("claude-sonnet-4-6", ModelPricing::new(3.00, 15.00))
            .with_model("claude-haiku-4-5-20251001", ModelPricing::new(0.80, 4.00))
    }
}

impl PricingTable {
    /// A table with no registered models.
    pub fn empty() -> Self {
        Self {
            models: IndexMap::new(),
        }
    }

    /// Registers (or replaces) the rates for `model`.
    pub fn with_model(mut self, model: impl Into<String>, pricing: ModelPricing) -> Self {
        self.models.insert(model.into(), pricing);
        self
    }

    /// Looks up the rates for `model`.
    ///
    /// # Errors
    ///
    /// * `AppError::UnknownModel` if nothing is registered under that name.
    pub fn lookup(&self, model: &str) -> AppResult<&ModelPricing> {
        self.models
            .get(model)
            .ok_or_else(|| AppError::UnknownModel(model.to_string()))
    }

    /// Cost of a token count for `model`.
    pub fn estimate_cost(&self, input_tokens: u64, output_tokens: u64, model: &str) -> AppResult<f64> {
        self.lookup(model)
            .map(|pricing| estimate_cost(input_tokens, output_tokens, pricing))
    }

    /// Registered model identifiers, in registration order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

/// Formats a cost as dollars with four decimals, e.g. `$0.0042`.
pub fn format_cost(cost: f64) -> String {
    format!("${:.4}", cost)
}

/// Rough token estimate: one token per four characters, at least one.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64 / 4).max(1)
}

/// Expected size and cost of a full run, computed before any call is made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    /// Estimated prompt tokens.
    pub input_tokens: u64,
    /// Estimated generated tokens.
    pub output_tokens: u64,
    /// Estimated USD cost.
    pub cost_usd: f64,
}

impl CostEstimate {
    /// Input plus output tokens.
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Estimates a full run (every endpoint plus the overview) for `model`.
pub fn preflight_estimate(
    spec: &Specification,
    model: &str,
    pricing: &PricingTable,
) -> AppResult<CostEstimate> {
    let input_tokens = spec
        .endpoints
        .iter()
        .map(|ep| estimate_tokens(&build_endpoint_prompt(ep)))
        .sum::<u64>()
        + estimate_tokens(&build_overview_prompt(spec));
    let output_tokens =
        ESTIMATED_ENDPOINT_OUTPUT_TOKENS * spec.endpoints.len() as u64 + ESTIMATED_OVERVIEW_OUTPUT_TOKENS;

    Ok(CostEstimate {
        input_tokens,
        output_tokens,
        cost_usd: pricing.estimate_cost(input_tokens, output_tokens, model)?,
    })
}
