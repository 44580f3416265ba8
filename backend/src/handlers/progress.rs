// src/handlers/progress.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{error::AppError, services::ProgressService, utils::jwt::Claims};

/// Enrolls the caller in a course.
pub async fn enroll(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let progress = service.enroll(&claims.sub, &course_id).await?;
    Ok((StatusCode::CREATED, Json(progress)))
}

/// Marks a module as completed without a quiz.
pub async fn complete_module(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path((course_id, module_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let progress = service
        .mark_module_complete(&claims.sub, &course_id, &module_id)
        .await?;
    Ok(Json(progress))
}

/// Course progress for the caller, recomputed from module records on every read.
pub async fn get_course_progress(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let progress = service.recalculate(&claims.sub, &course_id).await?;
    Ok(Json(progress))
}

/// Dashboard summary over all of the caller's courses.
pub async fn get_overall_progress(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let overall = service.summarize(&claims.sub).await?;
    Ok(Json(overall))
}
