use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{RankingPeriod, RankingRegistration};
use super::repository::RankingRepository;
use super::service::{RankingError, RankingService};
use crate::workflows::analysis::AnalysisRepository;
use crate::workflows::RepositoryError;

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

pub fn ranking_router<A, K>(service: Arc<RankingService<A, K>>) -> Router
where
    A: AnalysisRepository + 'static,
    K: RankingRepository + 'static,
{
    Router::new()
        .route("/api/v1/ranking/register", post(register_handler::<A, K>))
        .route("/api/v1/ranking/:period", get(leaderboard_handler::<A, K>))
        .with_state(service)
}

pub(crate) async fn register_handler<A, K>(
    State(service): State<Arc<RankingService<A, K>>>,
    axum::Json(registration): axum::Json<RankingRegistration>,
) -> Response
where
    A: AnalysisRepository + 'static,
    K: RankingRepository + 'static,
{
    match service.register(registration, Utc::now()) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn leaderboard_handler<A, K>(
    State(service): State<Arc<RankingService<A, K>>>,
    Path(period): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    A: AnalysisRepository + 'static,
    K: RankingRepository + 'static,
{
    let period = match period.parse::<RankingPeriod>() {
        Ok(period) => period,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    match service.leaderboard(period, query.limit, Utc::now()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RankingError) -> Response {
    let status = match &err {
        RankingError::IntroTooLong { .. } | RankingError::Unpaired(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RankingError::NotCompleted(_) | RankingError::Repository(RepositoryError::Conflict) => {
            StatusCode::CONFLICT
        }
        RankingError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RankingError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
