// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{error::AppError, models::course::PutCourseRequest, services::ProgressService};

/// Creates or replaces a course definition.
/// Admins and instructors only.
pub async fn put_course(
    State(service): State<ProgressService>,
    Path(course_id): Path<String>,
    Json(payload): Json<PutCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let course = payload.into_definition()?;
    service.put_course(&course_id, &course).await?;

    Ok(Json(course))
}

/// Reads a course definition, including correct answers.
/// Admins and instructors only.
pub async fn get_course(
    State(service): State<ProgressService>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    crate::utils::ids::ensure_segment("course", &course_id)?;

    let course = service
        .course(&course_id)
        .await?
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    Ok(Json(course))
}
