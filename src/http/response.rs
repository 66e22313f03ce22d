//! Error classification and failure responses.
//!
//! # Responsibilities
//! - Map every failure to one status code and the failure envelope
//! - Attach the error text to the response for the outcome recorder
//!
//! # Design Decisions
//! - Handlers return `ApiResult` and use `?`; no per-handler error wrapping
//! - Upstream error text is shown to clients verbatim
//! - A null upstream answer is not an error here; handlers decide whether
//!   it means 404 or an unavailable field

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shaping::Envelope;
use crate::upstream::{UnknownCategory, UpstreamError};

/// Result type every API handler returns.
pub type ApiResult = Result<Json<Envelope>, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, blank or malformed parameter.
    #[error("{0}")]
    Validation(String),

    /// Single-entity lookup came back empty. Holds the entity label.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal server error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Endpoint not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error")]
    Panic,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Upstream(_) | ApiError::Panic => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UnknownCategory> for ApiError {
    fn from(err: UnknownCategory) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Error text of a failed request, carried as a response extension.
#[derive(Debug, Clone)]
pub struct FailureDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let mut response = (self.status(), Json(Envelope::failure(message.clone()))).into_response();
        response.extensions_mut().insert(FailureDetail(message));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("Student").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(UpstreamError::Other("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::from(UnknownCategory).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::NotFound("University logo").to_string(), "University logo not found");
        assert_eq!(
            ApiError::from(UpstreamError::Other("connection reset".into())).to_string(),
            "Internal server error: connection reset"
        );
    }

    #[test]
    fn test_response_carries_failure_detail() {
        let response = ApiError::RouteNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let detail = response.extensions().get::<FailureDetail>().unwrap();
        assert_eq!(detail.0, "Endpoint not found");
    }
}
