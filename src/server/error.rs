//! Error taxonomy for the HTTP API and its status-code mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::ValidationError;

#[derive(Debug)]
pub enum ApiError {
    /// No valid session. Rendered as a bare 401.
    Unauthenticated,
    /// Request body failed schema checks.
    Validation(String),
    /// Target entry is absent or owned by someone else. The two cases are
    /// deliberately indistinguishable.
    NotFoundOrForbidden,
    /// Registration with a taken username.
    Conflict(String),
    /// Storage failure. Details are logged, never returned.
    Internal(sqlx::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthenticated => write!(f, "Unauthenticated"),
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::NotFoundOrForbidden => {
                write!(f, "Prayer entry not found or access denied")
            }
            ApiError::Conflict(msg) => write!(f, "{}", msg),
            ApiError::Internal(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Internal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.0)
    }
}

/// JSON error body
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Unauthenticated => return StatusCode::UNAUTHORIZED.into_response(),
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, "validation_error", message),
            ApiError::NotFoundOrForbidden => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Prayer entry not found or access denied".to_string(),
            ),
            ApiError::Conflict(message) => (StatusCode::BAD_REQUEST, "conflict", message),
            ApiError::Internal(e) => {
                tracing::error!("Request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}
