//! One-step `$ref` resolution against a schema's root `definitions`.

use serde_json::{Map, Value};
use tracing::debug;

/// The only reference shape the normalizer follows.
const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Extracts the root `definitions` map from a schema document.
pub fn definitions(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("definitions").and_then(Value::as_object)
}

/// Resolves a schema node one `$ref` step into the root `definitions`.
///
/// Only `#/definitions/<key>` pointers are followed, and only one step: the
/// resolved target is returned as-is even if it carries a `$ref` of its own.
/// A node without a string `$ref`, a pointer of any other shape, or a key
/// missing from `definitions` resolves to the node itself. The fallback is
/// silent so a dangling reference degrades to a type-less node instead of
/// failing the pass.
pub fn resolve_node<'a>(node: &'a Value, definitions: Option<&'a Map<String, Value>>) -> &'a Value {
    let Some(pointer) = node.get("$ref").and_then(Value::as_str) else {
        return node;
    };

    let Some(key) = pointer.strip_prefix(DEFINITIONS_PREFIX) else {
        debug!(pointer, "unsupported $ref shape, node left unresolved");
        return node;
    };

    match definitions.and_then(|defs| defs.get(key)) {
        Some(target) => target,
        None => {
            debug!(pointer, "no matching definition, node left unresolved");
            node
        }
    }
}

/// Whether a node's `$ref` (if any) points at an existing root definition.
///
/// Used by the linter to flag references the normalizer will not follow.
pub fn ref_resolves(node: &Value, definitions: Option<&Map<String, Value>>) -> bool {
    match node.get("$ref").and_then(Value::as_str) {
        Some(pointer) => match pointer.strip_prefix(DEFINITIONS_PREFIX) {
            Some(key) => definitions.is_some_and(|defs| defs.contains_key(key)),
            None => false,
        },
        None => true,
    }
}
