use axum::{extract::State, Json};
use serde_json::json;

use crate::http::request::{ApiQuery, KeywordQuery};
use crate::http::response::ApiResult;
use crate::http::server::AppState;
use crate::shaping::Envelope;
use crate::upstream::UpstreamCall;

/// Cross-category search. The combined answer is passed through as-is,
/// without the `{"data": [...]}` normalization the per-entity searches get.
pub async fn search_all(State(state): State<AppState>, ApiQuery(query): ApiQuery<KeywordQuery>) -> ApiResult {
    let keyword = query.keyword()?;
    let session = state.upstream.session().await?;
    let raw = session.fetch(UpstreamCall::SearchAll(keyword.clone())).await?;

    let envelope = if raw.is_truthy() {
        Envelope::success(raw.into_value(), format!("Search completed for '{keyword}'"))
    } else {
        Envelope::success(json!([]), format!("No results found for '{keyword}'"))
    };
    Ok(Json(envelope))
}
