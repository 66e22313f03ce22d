use axum::{extract::State, Json};
use serde_json::Value;

use crate::http::handlers::{keyword_search, merge_fields, Entity};
use crate::http::request::{ApiQuery, EntityId, KeywordQuery};
use crate::http::response::{ApiError, ApiResult};
use crate::http::server::AppState;
use crate::shaping::{Envelope, Extract, MergeField};
use crate::upstream::UpstreamCall;

pub async fn search(State(state): State<AppState>, ApiQuery(query): ApiQuery<KeywordQuery>) -> ApiResult {
    keyword_search(&state, Entity::Program, &query).await
}

/// Detail plus description. A partial answer is still returned; 404 only
/// when neither call found anything.
pub async fn detail(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult {
    let fields = [
        MergeField::new("detail", UpstreamCall::ProgramDetail(id.clone()), Extract::WholeOrEmptyMapping),
        MergeField::new("description", UpstreamCall::ProgramDescription(id), Extract::WholeOrEmptyMapping),
    ];
    let merged = merge_fields(&state, &fields).await?;
    if !merged.any_found {
        return Err(ApiError::NotFound("Program"));
    }
    Ok(Json(Envelope::success(
        Value::Object(merged.fields),
        "Program details retrieved successfully",
    )))
}
