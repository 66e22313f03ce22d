use axum::extract::State;

use crate::http::handlers::{keyword_search, lookup, Entity};
use crate::http::request::{ApiQuery, EntityId, KeywordQuery};
use crate::http::response::ApiResult;
use crate::http::server::AppState;
use crate::upstream::UpstreamCall;

pub async fn search(State(state): State<AppState>, ApiQuery(query): ApiQuery<KeywordQuery>) -> ApiResult {
    keyword_search(&state, Entity::Student, &query).await
}

pub async fn detail(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult {
    lookup(
        &state,
        UpstreamCall::StudentDetail(id),
        "Student",
        "Student details retrieved successfully",
    )
    .await
}
