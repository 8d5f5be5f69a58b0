#![deny(missing_docs)]

//! # Spec Loader
//!
//! Top-level entry point: reads a document from disk, decodes it by
//! extension, inlines schema references and assembles the [`Specification`].
//!
//! All failures are immediate; nothing here retries.

use crate::error::{AppError, AppResult, FormatCause};
use crate::oas::document::{decode_document, get_object, scalar_to_string, DocumentFormat};
use crate::oas::models::Specification;
use crate::oas::resolver::resolve_refs;
use crate::oas::routes::extract_endpoints;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Placeholder used when `info.title` or `info.version` is missing.
pub const UNKNOWN: &str = "Unknown";

/// Loads and normalizes the OpenAPI document at `path`.
///
/// # Errors
///
/// * `AppError::NotFound` if the file does not exist.
/// * `AppError::Format` if the extension is unsupported, the content is not
///   UTF-8 or decoding fails.
/// * `AppError::General` if the file exists but cannot be read.
pub fn load_spec(path: impl AsRef<Path>) -> AppResult<Specification> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AppError::NotFound(path.to_path_buf()));
    }

    let format = DocumentFormat::from_path(path).map_err(|cause| AppError::Format {
        path: path.to_path_buf(),
        cause,
    })?;

    let bytes = fs::read(path).map_err(|e| {
        AppError::General(format!("Failed to read spec file {}: {}", path.display(), e))
    })?;
    let content = String::from_utf8(bytes).map_err(|e| AppError::Format {
        path: path.to_path_buf(),
        cause: FormatCause::Encoding(e),
    })?;

    debug!("Decoding {} as {:?}", path.display(), format);
    parse_spec_str(&content, format, path)
}

/// Decodes `content` and builds a [`Specification`].
///
/// `origin` is only used to label decode errors.
pub fn parse_spec_str(
    content: &str,
    format: DocumentFormat,
    origin: &Path,
) -> AppResult<Specification> {
    let raw = decode_document(content, format).map_err(|cause| AppError::Format {
        path: origin.to_path_buf(),
        cause,
    })?;

    Ok(build_specification(&raw))
}

/// Builds a [`Specification`] from an already decoded document tree.
pub fn build_specification(raw: &Value) -> Specification {
    let resolved = resolve_refs(raw);
    let info = get_object(&resolved, "info");

    let title = info_field(info, "title");
    let version = info_field(info, "version");

    let base_url = resolved
        .get("servers")
        .and_then(Value::as_array)
        .and_then(|servers| servers.first())
        .and_then(|server| server.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Specification {
        title,
        version,
        description: info
            .and_then(|info| info.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string),
        base_url,
        endpoints: extract_endpoints(&resolved),
    }
}

fn info_field(info: Option<&Map<String, Value>>, key: &str) -> String {
    match info.and_then(|i| i.get(key)).and_then(scalar_to_string) {
        Some(value) if !value.is_empty() => value,
        _ => {
            warn!("Spec is missing info.{}; using '{}'", key, UNKNOWN);
            UNKNOWN.to_string()
        }
    }
}
