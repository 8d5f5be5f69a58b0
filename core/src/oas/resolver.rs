#![deny(missing_docs)]

//! # Reference Resolver
//!
//! Inlines document-local schema references (`#/components/schemas/{name}`)
//! into a copy of the document tree.
//!
//! Resolution is best-effort: cycles, dangling names and references that
//! leave the document are reported as diagnostics and the reference node is
//! kept verbatim. The walk always terminates because a schema name is never
//! expanded twice along the same call path.

use crate::oas::ref_utils::{classify_reference, reference_target, RefTarget};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Schema names currently being expanded along the call path.
///
/// Lives on the stack only: each expansion links a new frame to its parent,
/// and unwinding the recursion drops it.
#[derive(Clone, Copy)]
struct Visiting<'a> {
    name: &'a str,
    parent: Option<&'a Visiting<'a>>,
}

fn is_visiting(mut frame: Option<&Visiting<'_>>, name: &str) -> bool {
    while let Some(f) = frame {
        if f.name == name {
            return true;
        }
        frame = f.parent;
    }
    false
}

/// Returns a copy of `document` with every resolvable schema reference inlined.
///
/// A reference node is a mapping whose only key is `$ref`; mappings that carry
/// `$ref` next to other keys are walked as ordinary mappings.
pub fn resolve_refs(document: &Value) -> Value {
    let empty = Map::new();
    let schemas = document
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    resolve_node(document, schemas, None)
}

fn resolve_node(node: &Value, schemas: &Map<String, Value>, visiting: Option<&Visiting<'_>>) -> Value {
    match node {
        Value::Object(map) => {
            if let Some(target) = reference_target(map) {
                return resolve_reference(node, target, schemas, visiting);
            }
            let resolved = map
                .iter()
                .map(|(k, v)| (k.clone(), resolve_node(v, schemas, visiting)))
                .collect();
            Value::Object(resolved)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_node(item, schemas, visiting))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

fn resolve_reference(
    node: &Value,
    target: &str,
    schemas: &Map<String, Value>,
    visiting: Option<&Visiting<'_>>,
) -> Value {
    let name = match classify_reference(target) {
        RefTarget::Component { section, name } if section == "schemas" => name,
        RefTarget::Component { .. } => {
            debug!("Leaving component $ref for extraction: {}", target);
            return node.clone();
        }
        RefTarget::Local => {
            warn!("Unresolvable $ref '{}'; leaving as-is", target);
            return node.clone();
        }
        RefTarget::External => {
            warn!("Skipping non-local $ref: {}", target);
            return node.clone();
        }
    };

    if is_visiting(visiting, &name) {
        warn!("Circular $ref detected for '{}'; breaking cycle", name);
        return node.clone();
    }

    let Some(definition) = schemas.get(&name) else {
        warn!("Unresolvable $ref '{}'; leaving as-is", target);
        return node.clone();
    };

    let frame = Visiting {
        name: &name,
        parent: visiting,
    };
    resolve_node(definition, schemas, Some(&frame))
}
