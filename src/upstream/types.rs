//! Upstream payload shapes and error definitions.

use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Which empty container an upstream answer was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyShape {
    Sequence,
    Mapping,
    Text,
}

/// One upstream answer, classified by shape.
///
/// Built from the decoded JSON so the shaping rules can match on it
/// exhaustively instead of probing the value at every call site.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload {
    /// Upstream had nothing (JSON null, 404, empty body).
    Null,
    /// `[]`, `{}` or `""`.
    Empty(EmptyShape),
    /// A non-empty JSON object.
    Mapping(Map<String, Value>),
    /// A non-empty JSON array.
    Sequence(Vec<Value>),
    /// Any other JSON value (non-empty string, number, bool).
    Scalar(Value),
}

impl UpstreamPayload {
    /// Registry truthiness: null, empty containers, `""`, `false` and zero are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            UpstreamPayload::Null | UpstreamPayload::Empty(_) => false,
            UpstreamPayload::Mapping(_) | UpstreamPayload::Sequence(_) => true,
            UpstreamPayload::Scalar(value) => is_truthy(value),
        }
    }

    /// Convert back into the JSON value upstream sent.
    pub fn into_value(self) -> Value {
        match self {
            UpstreamPayload::Null => Value::Null,
            UpstreamPayload::Empty(EmptyShape::Sequence) => Value::Array(Vec::new()),
            UpstreamPayload::Empty(EmptyShape::Mapping) => Value::Object(Map::new()),
            UpstreamPayload::Empty(EmptyShape::Text) => Value::String(String::new()),
            UpstreamPayload::Mapping(map) => Value::Object(map),
            UpstreamPayload::Sequence(items) => Value::Array(items),
            UpstreamPayload::Scalar(value) => value,
        }
    }
}

impl From<Value> for UpstreamPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => UpstreamPayload::Null,
            Value::Array(items) if items.is_empty() => UpstreamPayload::Empty(EmptyShape::Sequence),
            Value::Array(items) => UpstreamPayload::Sequence(items),
            Value::Object(map) if map.is_empty() => UpstreamPayload::Empty(EmptyShape::Mapping),
            Value::Object(map) => UpstreamPayload::Mapping(map),
            Value::String(s) if s.is_empty() => UpstreamPayload::Empty(EmptyShape::Text),
            other => UpstreamPayload::Scalar(other),
        }
    }
}

/// Registry truthiness for a bare JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Errors raised while talking to the registry.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{call} request failed: {source}")]
    Transport {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{call} returned HTTP {status}")]
    Status { call: &'static str, status: u16 },

    #[error("{call} returned malformed JSON: {source}")]
    Decode {
        call: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{call} timed out after {}s", .after.as_secs())]
    Timeout { call: &'static str, after: Duration },

    #[error("upstream client is shut down")]
    Closed,

    #[error("{0}")]
    Other(String),
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifies_shapes() {
        assert_eq!(UpstreamPayload::from(Value::Null), UpstreamPayload::Null);
        assert_eq!(UpstreamPayload::from(json!([])), UpstreamPayload::Empty(EmptyShape::Sequence));
        assert_eq!(UpstreamPayload::from(json!({})), UpstreamPayload::Empty(EmptyShape::Mapping));
        assert_eq!(UpstreamPayload::from(json!("")), UpstreamPayload::Empty(EmptyShape::Text));
        assert!(matches!(UpstreamPayload::from(json!([1])), UpstreamPayload::Sequence(_)));
        assert!(matches!(UpstreamPayload::from(json!({"a": 1})), UpstreamPayload::Mapping(_)));
        assert!(matches!(UpstreamPayload::from(json!("iVBOR")), UpstreamPayload::Scalar(_)));
    }

    #[test]
    fn test_truthiness() {
        assert!(!UpstreamPayload::from(json!(0)).is_truthy());
        assert!(!UpstreamPayload::from(json!(false)).is_truthy());
        assert!(UpstreamPayload::from(json!(0.5)).is_truthy());
        assert!(UpstreamPayload::from(json!({"data": []})).is_truthy());
        assert!(!UpstreamPayload::Empty(EmptyShape::Mapping).is_truthy());
    }

    #[test]
    fn test_into_value_restores_original_shape() {
        for original in [json!(null), json!([]), json!({}), json!(""), json!({"k": [1, 2]}), json!(7)] {
            assert_eq!(UpstreamPayload::from(original.clone()).into_value(), original);
        }
    }

    #[test]
    fn test_timeout_message() {
        let err = UpstreamError::Timeout {
            call: "university_detail",
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "university_detail timed out after 30s");
    }
}
