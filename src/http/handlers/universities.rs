use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::http::handlers::{keyword_search, lookup, merge_fields, Entity};
use crate::http::request::{ApiQuery, EntityId, KeywordQuery, SemesterQuery};
use crate::http::response::{ApiError, ApiResult};
use crate::http::server::AppState;
use crate::shaping::{json_len, Envelope, Extract, MergeField};
use crate::upstream::{is_truthy, UpstreamCall, UpstreamPayload};

pub async fn search(State(state): State<AppState>, ApiQuery(query): ApiQuery<KeywordQuery>) -> ApiResult {
    keyword_search(&state, Entity::University, &query).await
}

pub async fn detail(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult {
    lookup(
        &state,
        UpstreamCall::UniversityDetail(id),
        "University",
        "University details retrieved successfully",
    )
    .await
}

/// Programs offered in one semester. Unlike search, an empty result is a
/// bare `[]` rather than `{"data": []}`.
pub async fn programs(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ApiQuery(query): ApiQuery<SemesterQuery>,
) -> ApiResult {
    let semester = query.semester()?;
    let session = state.upstream.session().await?;
    let raw = session
        .fetch(UpstreamCall::UniversityPrograms {
            id,
            semester: semester.clone(),
        })
        .await?;

    let count = match &raw {
        UpstreamPayload::Mapping(map) => map.get("data").filter(|d| is_truthy(d)).map(json_len),
        UpstreamPayload::Sequence(items) => Some(items.len()),
        _ => None,
    };
    let envelope = match count {
        Some(n) => Envelope::success(raw.into_value(), format!("Found {n} programs for semester {semester}")),
        None => Envelope::success(json!([]), format!("No programs found for semester {semester}")),
    };
    Ok(Json(envelope))
}

pub async fn logo(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult {
    let session = state.upstream.session().await?;
    let raw = session.fetch(UpstreamCall::UniversityLogo(id)).await?;
    if !raw.is_truthy() {
        return Err(ApiError::NotFound("University logo"));
    }
    Ok(Json(Envelope::success(
        json!({ "logo_base64": raw.into_value(), "format": "base64" }),
        "University logo retrieved successfully",
    )))
}

pub async fn stats(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult {
    let fields = [
        MergeField::new("students", UpstreamCall::UniversityStudentCount(id.clone()), Extract::Field("jumlah_mahasiswa")),
        MergeField::new("lecturers", UpstreamCall::UniversityLecturerCount(id.clone()), Extract::Field("jumlah_dosen")),
        MergeField::new("programs", UpstreamCall::UniversityProgramCount(id.clone()), Extract::Field("jumlah_prodi")),
        MergeField::new("ratio", UpstreamCall::UniversityRatio(id.clone()), Extract::Field("rasio")),
        MergeField::new("graduation_rate", UpstreamCall::UniversityGraduationRate(id.clone()), Extract::Field("graduation_rate")),
        MergeField::new("cost_range", UpstreamCall::UniversityCostRange(id), Extract::Field("range_biaya_kuliah")),
    ];
    let merged = merge_fields(&state, &fields).await?;
    Ok(Json(Envelope::success(
        Value::Object(merged.fields),
        "University statistics retrieved successfully",
    )))
}
