use axum::Json;
use serde_json::{json, Value};

use crate::http::response::ApiError;

/// Static map of the API.
pub async fn api_map() -> Json<Value> {
    Json(json!({
        "name": "PDDIKTI REST API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "REST API wrapper for PDDIKTI (Pangkalan Data Pendidikan Tinggi) Indonesia",
        "endpoints": {
            "universities": {
                "search": "/api/v1/universities/search?q=<keyword>",
                "detail": "/api/v1/universities/<university_id>",
                "programs": "/api/v1/universities/<university_id>/programs?semester=<semester>",
                "logo": "/api/v1/universities/<university_id>/logo",
                "statistics": "/api/v1/universities/<university_id>/stats"
            },
            "students": {
                "search": "/api/v1/students/search?q=<keyword>",
                "detail": "/api/v1/students/<student_id>"
            },
            "lecturers": {
                "search": "/api/v1/lecturers/search?q=<keyword>",
                "profile": "/api/v1/lecturers/<lecturer_id>",
                "research": "/api/v1/lecturers/<lecturer_id>/research"
            },
            "programs": {
                "search": "/api/v1/programs/search?q=<keyword>",
                "detail": "/api/v1/programs/<program_id>"
            },
            "search": {
                "all": "/api/v1/search?q=<keyword>"
            },
            "statistics": {
                "counts": "/api/v1/statistics/counts",
                "visualizations": "/api/v1/statistics/visualizations?category=<category>"
            }
        }
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
