//! Merging several upstream answers into one flat object.
//!
//! Each output field is fed by one upstream call. A null or empty answer
//! means "field unavailable" and yields the field's fallback; it never
//! fails the request.

use serde_json::{Map, Value};

use crate::upstream::{UpstreamCall, UpstreamPayload};

/// How an output field is taken from its upstream answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// One named key of a mapping answer, null when unavailable.
    Field(&'static str),
    /// One named list-valued key, `[]` when unavailable. A bare list
    /// answer is used as the list itself.
    ListField(&'static str),
    /// The raw answer, null when upstream had nothing.
    Whole,
    /// The answer when truthy, `{}` otherwise.
    WholeOrEmptyMapping,
}

impl Extract {
    pub fn apply(self, payload: UpstreamPayload) -> Value {
        match self {
            Extract::Field(key) => match payload {
                UpstreamPayload::Mapping(mut map) => map.remove(key).unwrap_or(Value::Null),
                _ => Value::Null,
            },
            Extract::ListField(key) => match payload {
                UpstreamPayload::Mapping(mut map) => match map.remove(key) {
                    Some(Value::Null) | None => Value::Array(Vec::new()),
                    Some(value) => value,
                },
                UpstreamPayload::Sequence(items) => Value::Array(items),
                _ => Value::Array(Vec::new()),
            },
            Extract::Whole => payload.into_value(),
            Extract::WholeOrEmptyMapping => {
                if payload.is_truthy() {
                    payload.into_value()
                } else {
                    Value::Object(Map::new())
                }
            }
        }
    }
}

/// One output field, the call feeding it, and how to extract it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeField {
    pub name: &'static str,
    pub call: UpstreamCall,
    pub extract: Extract,
}

impl MergeField {
    pub fn new(name: &'static str, call: UpstreamCall, extract: Extract) -> Self {
        Self { name, call, extract }
    }
}

/// Combine answers (in the same order as `fields`) into one object.
pub fn merge(fields: &[MergeField], payloads: Vec<UpstreamPayload>) -> Map<String, Value> {
    debug_assert_eq!(fields.len(), payloads.len());
    fields
        .iter()
        .zip(payloads)
        .map(|(field, payload)| (field.name.to_string(), field.extract.apply(payload)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(value: Value) -> UpstreamPayload {
        UpstreamPayload::from(value)
    }

    #[test]
    fn test_field_is_null_safe() {
        assert_eq!(Extract::Field("rasio").apply(p(json!({"rasio": "1:20"}))), json!("1:20"));
        assert_eq!(Extract::Field("rasio").apply(p(json!({"other": 1}))), Value::Null);
        assert_eq!(Extract::Field("rasio").apply(p(json!(null))), Value::Null);
        assert_eq!(Extract::Field("rasio").apply(p(json!([{"rasio": 1}]))), Value::Null);
    }

    #[test]
    fn test_list_field_defaults_to_empty_list() {
        let extract = Extract::ListField("data");
        assert_eq!(extract.apply(p(json!({"data": [1, 2]}))), json!([1, 2]));
        assert_eq!(extract.apply(p(json!({"data": null}))), json!([]));
        assert_eq!(extract.apply(p(json!(null))), json!([]));
        assert_eq!(extract.apply(p(json!([{"judul": "x"}]))), json!([{"judul": "x"}]));
    }

    #[test]
    fn test_whole_variants() {
        assert_eq!(Extract::Whole.apply(p(json!([]))), json!([]));
        assert_eq!(Extract::Whole.apply(p(json!(null))), Value::Null);
        assert_eq!(Extract::WholeOrEmptyMapping.apply(p(json!(null))), json!({}));
        assert_eq!(Extract::WholeOrEmptyMapping.apply(p(json!({"a": 1}))), json!({"a": 1}));
    }

    #[test]
    fn test_merge_all_null_keeps_every_field() {
        let fields = vec![
            MergeField::new("students", UpstreamCall::UniversityStudentCount("x".into()), Extract::Field("jumlah_mahasiswa")),
            MergeField::new("ratio", UpstreamCall::UniversityRatio("x".into()), Extract::Field("rasio")),
        ];
        let merged = merge(&fields, vec![UpstreamPayload::Null, UpstreamPayload::Null]);
        assert_eq!(Value::Object(merged), json!({"students": null, "ratio": null}));
    }
}
