// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError, models::user::UpdateUserRequest, services::ProgressService,
    utils::jwt::Claims,
};

/// Get current user's profile.
pub async fn get_me(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.user_info(&claims.sub).await?))
}

/// Update current user's profile.
pub async fn update_me(
    State(service): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(service.update_user_info(&claims.sub, payload).await?))
}

/// Public profile of another user (e.g. a course instructor).
pub async fn get_user(
    State(service): State<ProgressService>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.user_info(&user_id).await?))
}
