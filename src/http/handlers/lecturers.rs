use axum::{extract::State, Json};
use serde_json::Value;

use crate::http::handlers::{keyword_search, lookup, merge_fields, Entity};
use crate::http::request::{ApiQuery, EntityId, KeywordQuery};
use crate::http::response::ApiResult;
use crate::http::server::AppState;
use crate::shaping::{Envelope, Extract, MergeField};
use crate::upstream::UpstreamCall;

pub async fn search(State(state): State<AppState>, ApiQuery(query): ApiQuery<KeywordQuery>) -> ApiResult {
    keyword_search(&state, Entity::Lecturer, &query).await
}

pub async fn profile(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult {
    lookup(
        &state,
        UpstreamCall::LecturerProfile(id),
        "Lecturer",
        "Lecturer profile retrieved successfully",
    )
    .await
}

/// Research, community service, publications and patents. Each list is
/// `[]` when the registry has nothing for it.
pub async fn research(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult {
    let fields = [
        MergeField::new("research", UpstreamCall::LecturerResearch(id.clone()), Extract::ListField("data")),
        MergeField::new("community_service", UpstreamCall::LecturerCommunityService(id.clone()), Extract::ListField("data")),
        MergeField::new("publications", UpstreamCall::LecturerPublications(id.clone()), Extract::ListField("data")),
        MergeField::new("patents", UpstreamCall::LecturerPatents(id), Extract::ListField("data")),
    ];
    let merged = merge_fields(&state, &fields).await?;
    Ok(Json(Envelope::success(
        Value::Object(merged.fields),
        "Lecturer research activities retrieved successfully",
    )))
}
