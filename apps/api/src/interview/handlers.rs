//! Axum route handlers for the Interview API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::interview::orchestrator::{
    StartInterviewRequest, StartInterviewResponse, SubmitAnswerRequest, SubmitAnswerResponse,
};
use crate::models::interview::{Interview, InterviewResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// POST /api/interview/start
pub async fn handle_start_interview(
    State(state): State<AppState>,
    payload: Result<Json<StartInterviewRequest>, JsonRejection>,
) -> Result<Json<StartInterviewResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(state.interviews.start(request).await?))
}

/// POST /api/interview/submit
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    payload: Result<Json<SubmitAnswerRequest>, JsonRejection>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(state.interviews.submit_answer(request).await?))
}

/// GET /api/interview/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewResult>, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid interview ID".to_string()))?;
    Ok(Json(state.interviews.get_interview(id).await?))
}

/// GET /api/interviews?email=
pub async fn handle_user_interviews(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<Interview>>, AppError> {
    let email = params.email.unwrap_or_default();
    Ok(Json(state.interviews.get_user_interviews(&email).await?))
}
