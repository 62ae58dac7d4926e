// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate username, misuse of a quiz session)
    Conflict(String),

    // 502 Bad Gateway (an upstream service answered with an error)
    Upstream(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream service failed".to_string())
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Errors raised by the quiz engine itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// A question bank is empty or malformed. This is a content bug.
    Configuration(String),

    /// The session API was called in a state that does not allow it.
    InvalidSession(String),

    /// No bank is registered under the requested book slug.
    UnknownBook(String),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            QuizError::InvalidSession(msg) => write!(f, "invalid session operation: {}", msg),
            QuizError::UnknownBook(slug) => write!(f, "unknown book '{}'", slug),
        }
    }
}

impl std::error::Error for QuizError {}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::Configuration(_) => AppError::InternalServerError(err.to_string()),
            QuizError::InvalidSession(_) => AppError::Conflict(err.to_string()),
            QuizError::UnknownBook(_) => AppError::NotFound(err.to_string()),
        }
    }
}
