use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnalysisSubmission, AnalysisView, CoupleId, Partner, RequestId};
use super::repository::AnalysisRepository;
use super::service::{AnalysisService, AnalysisServiceError};
use crate::workflows::RepositoryError;

/// Body of the stateless preview endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    pub person1: Partner,
    pub person2: Partner,
}

/// Router builder exposing HTTP endpoints for scoring and history.
pub fn analysis_router<R>(service: Arc<AnalysisService<R>>) -> Router
where
    R: AnalysisRepository + 'static,
{
    Router::new()
        .route("/api/v1/analysis", post(submit_handler::<R>))
        .route("/api/v1/analysis/preview", post(preview_handler::<R>))
        .route("/api/v1/analysis/:request_id", get(status_handler::<R>))
        .route(
            "/api/v1/analysis/couples/:couple_id/history",
            get(history_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    axum::Json(submission): axum::Json<AnalysisSubmission>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.preview(&request.person1, &request.person2) {
        Ok(result) => {
            let view = AnalysisView::preview(&request.person1, &request.person2, &result);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.get(&RequestId(request_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Path(couple_id): Path<String>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    let couple_id = CoupleId(couple_id);
    match service.history(&couple_id) {
        Ok(entries) => {
            let payload = json!({
                "couple_id": couple_id,
                "total_entries": entries.len(),
                "history": entries,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: AnalysisServiceError) -> Response {
    let status = match &err {
        AnalysisServiceError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AnalysisServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AnalysisServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
