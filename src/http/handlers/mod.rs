//! Route handlers.
//!
//! Every handler follows one of three shapes:
//! - validate a parameter, call one upstream operation, normalize or wrap
//! - call several operations and merge them into one flat object
//! - call one operation and pass the answer through in the envelope
//!
//! The shared shapes live here; the per-resource modules only name calls
//! and messages.

pub mod index;
pub mod lecturers;
pub mod programs;
pub mod search;
pub mod statistics;
pub mod students;
pub mod universities;

use axum::Json;
use serde_json::{Map, Value};

use crate::http::request::KeywordQuery;
use crate::http::response::{ApiError, ApiResult};
use crate::http::server::AppState;
use crate::shaping::{merge, normalize, Envelope, MergeField};
use crate::upstream::UpstreamCall;

/// Resource kinds with a keyword search and a single-entity lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    University,
    Student,
    Lecturer,
    Program,
}

impl Entity {
    pub fn plural(&self) -> &'static str {
        match self {
            Entity::University => "universities",
            Entity::Student => "students",
            Entity::Lecturer => "lecturers",
            Entity::Program => "programs",
        }
    }

    fn search_call(&self, keyword: String) -> UpstreamCall {
        match self {
            Entity::University => UpstreamCall::SearchUniversities(keyword),
            Entity::Student => UpstreamCall::SearchStudents(keyword),
            Entity::Lecturer => UpstreamCall::SearchLecturers(keyword),
            Entity::Program => UpstreamCall::SearchPrograms(keyword),
        }
    }
}

/// Keyword search with normalized `{"data": [...]}` output.
pub(crate) async fn keyword_search(state: &AppState, entity: Entity, query: &KeywordQuery) -> ApiResult {
    let keyword = query.keyword()?;
    let session = state.upstream.session().await?;
    let raw = session.fetch(entity.search_call(keyword.clone())).await?;

    let plural = entity.plural();
    let (envelope, count) = normalize(
        raw,
        format!("No {plural} found matching '{keyword}'"),
        |n| format!("Found {n} {plural} matching '{keyword}'"),
    );
    tracing::debug!(entity = plural, count, "Search finished");
    Ok(Json(envelope))
}

/// Single-entity lookup: truthy answer passes through, anything else is 404.
pub(crate) async fn lookup(
    state: &AppState,
    call: UpstreamCall,
    label: &'static str,
    message: &'static str,
) -> ApiResult {
    let session = state.upstream.session().await?;
    let raw = session.fetch(call).await?;
    if !raw.is_truthy() {
        return Err(ApiError::NotFound(label));
    }
    Ok(Json(Envelope::success(raw.into_value(), message)))
}

/// Merged output and whether any upstream answer was truthy.
pub(crate) struct Merged {
    pub fields: Map<String, Value>,
    pub any_found: bool,
}

/// Issue every field's call and merge the answers.
pub(crate) async fn merge_fields(state: &AppState, fields: &[MergeField]) -> Result<Merged, ApiError> {
    let session = state.upstream.session().await?;
    let payloads = session
        .fetch_all(fields.iter().map(|field| field.call.clone()))
        .await?;
    let any_found = payloads.iter().any(|p| p.is_truthy());
    Ok(Merged {
        fields: merge(fields, payloads),
        any_found,
    })
}
