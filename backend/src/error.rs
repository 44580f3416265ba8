// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Every failure degrades a single read or write and is reported to the caller.
#[derive(Debug)]
pub enum AppError {
    // 422 Unprocessable Entity: some questions have no answer
    IncompleteSubmission { missing: Vec<usize> },

    // 503 Service Unavailable: store read/write failed, caller may retry
    PersistenceError(String),

    // 404 Not Found
    NotFound(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden
    Forbidden(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl AppError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::PersistenceError(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::IncompleteSubmission { missing } => {
                write!(f, "incomplete submission, unanswered questions: {:?}", missing)
            }
            AppError::PersistenceError(msg) => write!(f, "persistence error: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            AppError::AuthError(msg) => write!(f, "unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "forbidden: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::IncompleteSubmission { missing } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "All questions must be answered before submitting",
                    "missing": missing,
                }),
            ),
            AppError::PersistenceError(msg) => {
                tracing::error!("Persistence error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "Storage temporarily unavailable, please retry", "retryable": true }),
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows using `?` on store queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::PersistenceError(err.to_string())
    }
}

/// A stored document that no longer decodes is treated as a failed read.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::PersistenceError(format!("malformed record: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_errors_are_retryable() {
        assert!(AppError::PersistenceError("down".into()).is_retryable());
        assert!(!AppError::NotFound("x".into()).is_retryable());
        assert!(!AppError::IncompleteSubmission { missing: vec![1] }.is_retryable());
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (AppError::IncompleteSubmission { missing: vec![0] }, 422),
            (AppError::PersistenceError("x".into()), 503),
            (AppError::NotFound("x".into()), 404),
            (AppError::BadRequest("x".into()), 400),
            (AppError::AuthError("x".into()), 401),
            (AppError::Forbidden("x".into()), 403),
            (AppError::InternalServerError("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status().as_u16(), status);
        }
    }
}
