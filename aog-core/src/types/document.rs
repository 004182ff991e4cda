//! Schema-less payload documents.
//!
//! Request and response bodies are loosely typed at the boundary. Every field
//! access is explicit and checks presence; nothing here invents defaults.

use serde_json::{Map, Value};

/// A JSON object payload.
pub type Document = Map<String, Value>;

/// Copy `key` from `src` to `dst` unchanged, only when present.
pub fn forward_if_present(src: &Document, dst: &mut Document, key: &str) -> bool {
    rename_if_present(src, dst, key, key)
}

/// Copy `from` in `src` to `to` in `dst`, only when present.
pub fn rename_if_present(src: &Document, dst: &mut Document, from: &str, to: &str) -> bool {
    match src.get(from) {
        Some(value) => {
            dst.insert(to.to_string(), value.clone());
            true
        }
        None => false,
    }
}

/// Non-negative integer counter. Accepts integral floats since some backends
/// report counters as `26.0`.
pub fn get_u64(doc: &Document, key: &str) -> Option<u64> {
    let value = doc.get(key)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

/// Interpret a JSON value as a document, rejecting non-objects.
pub fn into_document(value: Value) -> Option<Document> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
