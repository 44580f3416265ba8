// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError, models::quiz::SubmitAttemptRequest, services::ProgressService,
    utils::jwt::Claims,
};

/// Returns the module quiz without correct answers.
pub async fn get_quiz(
    State(service): State<ProgressService>,
    Path((course_id, module_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = service.quiz(&course_id, &module_id).await?;
    Ok(Json(quiz.public_questions()))
}

/// Scores answers without storing them, so the client can show a result first.
pub async fn preview_attempt(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path((course_id, module_id)): Path<(String, String)>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = service
        .evaluate(&claims.sub, &course_id, &module_id, &req.answers)
        .await?;
    Ok(Json(result))
}

/// Scores answers and stores them as the caller's unconfirmed attempt.
///
/// * Every question must be answered (422 otherwise).
/// * Replaces any earlier unconfirmed attempt.
pub async fn submit_attempt(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path((course_id, module_id)): Path<(String, String)>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = service
        .submit_attempt(&claims.sub, &course_id, &module_id, &req.answers)
        .await?;
    Ok(Json(result))
}

/// Returns the caller's stored attempt on a module.
pub async fn get_attempt(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path((_course_id, module_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = service
        .latest_attempt(&claims.sub, &module_id)
        .await?
        .ok_or(AppError::NotFound("No attempt yet".to_string()))?;
    Ok(Json(attempt))
}

/// Confirms the caller's stored attempt and returns the module progress.
/// Can be retried as-is after a storage failure.
pub async fn confirm_attempt(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path((course_id, module_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let progress = service
        .confirm_attempt(&claims.sub, &course_id, &module_id)
        .await?;
    Ok(Json(progress))
}
