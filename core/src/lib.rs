#![deny(missing_docs)]

//! # apidoc Core
//!
//! Core library for turning OpenAPI documents into generated prose
//! documentation.
//!
//! The pipeline runs one way:
//! raw document -> [`oas::load_spec`] (resolve refs, extract endpoints,
//! summarize schemas) -> [`Specification`] -> [`Generator`] (one retried
//! call per endpoint) -> [`GenerationResult`] -> [`render::render`].

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) parsing and normalization.
pub mod oas;

/// Prompt construction.
pub mod prompts;

/// Remote generation, retries, orchestration and pricing.
pub mod generation;

/// Markdown / HTML rendering of generated docs.
pub mod render;

pub use error::{ApiError, AppError, AppResult, FormatCause};
pub use generation::{
    Completion, GeneratedDoc, GenerationClient, GenerationRequest, GenerationResult, Generator,
    GeneratorConfig, PricingTable, RetryPolicy, TokenUsage,
};
pub use oas::{
    load_spec, Endpoint, HttpMethod, Parameter, RequestBody, ResponseInfo, Specification,
};
pub use render::{format_html, format_markdown, render, sanitize_anchor, OutputFormat};
