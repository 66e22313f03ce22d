//! Search-result normalization.
//!
//! Upstream search endpoints answer with a `{"data": [...]}` mapping, a bare
//! list, or nothing at all. Clients always receive `{"data": [...]}`.
//!
//! Rules, first match wins:
//! 1. falsy answer → `{"data": []}` with the empty message
//! 2. mapping with a truthy `data` → the mapping unchanged
//! 3. non-empty list → wrapped as `{"data": list}`
//! 4. anything else → `{"data": []}` with the empty message

use serde_json::{json, Map, Value};

use crate::shaping::envelope::Envelope;
use crate::upstream::{is_truthy, UpstreamPayload};

/// Normalize one search answer. Returns the envelope and the record count.
pub fn normalize<F>(raw: UpstreamPayload, empty_message: impl Into<String>, found_message: F) -> (Envelope, usize)
where
    F: FnOnce(usize) -> String,
{
    match raw {
        UpstreamPayload::Mapping(map) => {
            match map.get("data").filter(|d| is_truthy(d)).map(json_len) {
                Some(count) => (Envelope::success(Value::Object(map), found_message(count)), count),
                None => not_found(empty_message),
            }
        }
        UpstreamPayload::Sequence(items) => {
            let count = items.len();
            let mut wrapped = Map::new();
            wrapped.insert("data".to_string(), Value::Array(items));
            (Envelope::success(Value::Object(wrapped), found_message(count)), count)
        }
        UpstreamPayload::Null | UpstreamPayload::Empty(_) | UpstreamPayload::Scalar(_) => {
            not_found(empty_message)
        }
    }
}

fn not_found(message: impl Into<String>) -> (Envelope, usize) {
    (Envelope::success(json!({ "data": [] }), message), 0)
}

/// Length of a truthy `data` value: element count for collections,
/// character count for strings, 1 for any other scalar.
pub fn json_len(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.chars().count(),
        Value::Null => 0,
        Value::Bool(_) | Value::Number(_) => 1,
    }
}
