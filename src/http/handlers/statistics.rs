use axum::{extract::State, Json};
use serde_json::Value;

use crate::http::handlers::merge_fields;
use crate::http::request::{ApiQuery, CategoryQuery};
use crate::http::response::ApiResult;
use crate::http::server::AppState;
use crate::shaping::{Envelope, Extract, MergeField};
use crate::upstream::{UpstreamCall, VisualizationCategory};

pub async fn counts(State(state): State<AppState>) -> ApiResult {
    let fields = [
        MergeField::new("active_lecturers", UpstreamCall::ActiveLecturerCount, Extract::Field("jumlah_dosen")),
        MergeField::new("active_students", UpstreamCall::ActiveStudentCount, Extract::Field("jumlah_mahasiswa")),
        MergeField::new("programs", UpstreamCall::ProgramCount, Extract::Field("jumlah")),
        MergeField::new("universities", UpstreamCall::UniversityCount, Extract::Field("jumlah")),
    ];
    let merged = merge_fields(&state, &fields).await?;
    Ok(Json(Envelope::success(
        Value::Object(merged.fields),
        "National statistics retrieved successfully",
    )))
}

/// Chart series for one category. The category is checked before any
/// upstream call is made.
pub async fn visualizations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> ApiResult {
    let category = query.category()?;
    let fields = chart_fields(category);
    let merged = merge_fields(&state, &fields).await?;
    Ok(Json(Envelope::success(
        Value::Object(merged.fields),
        format!("Visualization data for {category} retrieved successfully"),
    )))
}

fn chart_fields(category: VisualizationCategory) -> Vec<MergeField> {
    category
        .series()
        .into_iter()
        .map(|(name, series)| {
            MergeField::new(
                name,
                UpstreamCall::Visualization { category, series },
                Extract::Whole,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_fields_follow_category() {
        let fields = chart_fields(VisualizationCategory::Students);
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["by_field", "by_gender", "by_level", "by_status"]);
        assert!(fields.iter().all(|f| f.extract == Extract::Whole));
        assert_eq!(fields[1].call.to_string(), "mahasiswa/visualisasi/jenis-kelamin");
    }
}
