//! Cross-cutting request middleware.
//!
//! # Responsibilities
//! - Log every failed request once, with its route and error text
//! - Record request metrics by matched route
//! - Turn handler panics into the failure envelope

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::time::Instant;

use crate::http::response::{ApiError, FailureDetail};
use crate::observability::metrics;

/// Route label for requests no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Outcome recorder for every route and both fallbacks. Handlers never log
/// their own failures; this is the single place that does.
pub async fn record_outcome(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
        .to_owned();

    let response = next.run(request).await;
    let status = response.status();

    if let Some(FailureDetail(detail)) = response.extensions().get::<FailureDetail>() {
        if status.is_server_error() {
            tracing::error!(route = %route, status = status.as_u16(), error = %detail, "Request failed");
        } else {
            tracing::warn!(route = %route, status = status.as_u16(), error = %detail, "Request rejected");
        }
    } else {
        tracing::debug!(route = %route, status = status.as_u16(), "Request served");
    }

    metrics::record_request(&route, status.as_u16(), start);
    response
}

/// `CatchPanicLayer` handler.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::Panic.into_response()
}
