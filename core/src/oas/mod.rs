#![deny(missing_docs)]

//! # OpenAPI Parsing Module
//!
//! - **document**: JSON/YAML decoding into an ordered document tree.
//! - **resolver**: Inlining of `#/components/schemas` references, cycle-safe.
//! - **summary**: Bounded-depth schema summaries.
//! - **routes**: Endpoint extraction from `paths`.
//! - **loader**: File entry point assembling the [`Specification`].
//! - **models**: The canonical records.

pub mod document;
pub mod loader;
pub mod models;
pub(crate) mod ref_utils;
pub mod resolver;
pub mod routes;
pub mod summary;

// Re-export public API
pub use document::{decode_document, DocumentFormat};
pub use loader::{build_specification, load_spec, parse_spec_str};
pub use models::{Endpoint, HttpMethod, Parameter, RequestBody, ResponseInfo, Specification};
pub use resolver::resolve_refs;
pub use routes::extract_endpoints;
pub use summary::summarize_schema;
