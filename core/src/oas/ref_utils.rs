#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for recognizing `$ref` nodes and classifying their targets.
//!
//! These utilities never fetch external documents: anything that does not
//! start with `#` is reported as external and left for the caller to skip.

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

/// The reference marker key.
pub const REF_KEY: &str = "$ref";

/// Where a `$ref` string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RefTarget {
    /// `#/components/{section}/{name}` with a single decoded name segment.
    Component {
        /// Component table, e.g. `schemas` or `parameters`.
        section: String,
        /// Decoded component name.
        name: String,
    },
    /// Any other document-local pointer (e.g. into a schema's properties).
    Local,
    /// A pointer into another document or URL.
    External,
}

/// Returns the target string if `map` is a reference node.
///
/// A reference node has exactly one key, the reference marker, with a string
/// value. Sibling keys turn the node back into an ordinary mapping.
pub(crate) fn reference_target(map: &Map<String, Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    map.get(REF_KEY).and_then(Value::as_str)
}

/// Classifies a `$ref` string.
pub(crate) fn classify_reference(ref_str: &str) -> RefTarget {
    let Some(pointer) = ref_str.strip_prefix('#') else {
        return RefTarget::External;
    };

    let segments: Vec<&str> = pointer.trim_start_matches('/').split('/').collect();
    if segments.len() != 3 || segments[0] != "components" {
        return RefTarget::Local;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        return RefTarget::Local;
    }

    RefTarget::Component {
        section: decode_pointer_segment(segments[1]),
        name,
    }
}

/// Resolves a single-key `$ref` node against `#/components/{section}`.
///
/// Returns the node itself when it is not a reference, the component when the
/// reference targets `section`, and `None` when the target is missing.
pub(crate) fn lookup_component<'a>(
    node: &'a Value,
    document: &'a Value,
    section: &str,
) -> Option<&'a Value> {
    let Some(target) = node.as_object().and_then(reference_target) else {
        return Some(node);
    };

    match classify_reference(target) {
        RefTarget::Component { section: s, name } if s == section => document
            .get("components")
            .and_then(|c| c.get(section))
            .and_then(|table| table.get(&name)),
        _ => None,
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
