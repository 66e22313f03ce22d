//! Request handling: request IDs and parameter extraction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Extract query and path parameters, reporting problems as envelopes
//! - Validate required parameters before any upstream call is made
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Extractor rejections become `ApiError::Validation`, never axum's plain text

use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, HeaderValue, Request},
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

use crate::http::response::ApiError;
use crate::upstream::VisualizationCategory;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Query-string extractor whose rejection is a validation envelope.
///
/// A repeated key keeps its first value, so `?q=a&q=b` searches for `a`.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.uri.query().unwrap_or_default();
        let mut params = Map::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| Value::String(value.into_owned()));
        }
        T::deserialize(Value::Object(params))
            .map(ApiQuery)
            .map_err(|e| ApiError::Validation(format!("Invalid query string: {e}")))
    }
}

/// The `{id}` path segment of entity routes. Blank ids are rejected.
#[derive(Debug, Clone)]
pub struct EntityId(pub String);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        if id.trim().is_empty() {
            return Err(ApiError::Validation("Path parameter 'id' must not be blank".to_string()));
        }
        Ok(EntityId(id))
    }
}

/// `?q=` of the search routes.
#[derive(Debug, Default, Deserialize)]
pub struct KeywordQuery {
    pub q: Option<String>,
}

impl KeywordQuery {
    /// The trimmed keyword, or a validation error when missing or blank.
    pub fn keyword(&self) -> Result<String, ApiError> {
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Ok(q.to_string()),
            _ => Err(ApiError::Validation("Query parameter 'q' is required".to_string())),
        }
    }
}

/// `?semester=` of the university programs route, `YYYYS` (e.g. `20241`).
#[derive(Debug, Default, Deserialize)]
pub struct SemesterQuery {
    pub semester: Option<String>,
}

impl SemesterQuery {
    pub fn semester(&self) -> Result<String, ApiError> {
        match self.semester.as_deref().map(str::trim) {
            Some(s) if s.len() == 5 && s.bytes().all(|b| b.is_ascii_digit()) => Ok(s.to_string()),
            _ => Err(ApiError::Validation(
                "Query parameter 'semester' is required (format: YYYYS, e.g., 20241)".to_string(),
            )),
        }
    }
}

/// `?category=` of the visualization route; absent means universities.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    pub fn category(&self) -> Result<VisualizationCategory, ApiError> {
        match self.category.as_deref() {
            None => Ok(VisualizationCategory::default()),
            Some(name) => Ok(name.parse::<VisualizationCategory>()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_is_trimmed_and_required() {
        let query = KeywordQuery { q: Some("  indonesia ".into()) };
        assert_eq!(query.keyword().unwrap(), "indonesia");

        for q in [None, Some(String::new()), Some("   ".into())] {
            let err = KeywordQuery { q }.keyword().unwrap_err();
            assert_eq!(err.to_string(), "Query parameter 'q' is required");
        }
    }

    #[test]
    fn test_semester_format() {
        let ok = SemesterQuery { semester: Some("20241".into()) };
        assert_eq!(ok.semester().unwrap(), "20241");

        for bad in [None, Some("".into()), Some("2024".into()), Some("2024a".into()), Some("202411".into())] {
            assert!(SemesterQuery { semester: bad }.semester().is_err());
        }
    }

    #[test]
    fn test_category_defaults_and_rejects_unknown() {
        assert_eq!(CategoryQuery::default().category().unwrap(), VisualizationCategory::Universities);
        let lecturers = CategoryQuery { category: Some("lecturers".into()) };
        assert_eq!(lecturers.category().unwrap(), VisualizationCategory::Lecturers);

        let err = CategoryQuery { category: Some("unknown".into()) }.category().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().starts_with("Invalid category"));
    }

    async fn extract_query<T: DeserializeOwned>(uri: &str) -> Result<T, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ApiQuery::<T>::from_request_parts(&mut parts, &()).await.map(|ApiQuery(value)| value)
    }

    #[tokio::test]
    async fn test_repeated_key_keeps_first_value() {
        let query: KeywordQuery = extract_query("/s?q=first&q=second").await.unwrap();
        assert_eq!(query.keyword().unwrap(), "first");
    }

    #[tokio::test]
    async fn test_query_is_percent_decoded() {
        let query: KeywordQuery = extract_query("/s?q=ui%20jakarta&other=1").await.unwrap();
        assert_eq!(query.q.as_deref(), Some("ui jakarta"));

        let query: CategoryQuery = extract_query("/s").await.unwrap();
        assert!(query.category.is_none());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut make = UuidRequestId;
        let request = Request::new(());
        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
