//! HTTP error mapping.

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};

use promptdeck_core::Error;

/// Error returned by handlers and extractors.
///
/// Every variant renders as `{"error": message}` with the matching status.
#[derive(Debug)]
pub enum ApiError {
    /// Storage failure, reported with the backend's own message.
    Database(Error),
    Unauthorized(String),
    BadRequest(String),
    /// Failure whose detail is logged but replaced by a fixed message.
    Internal(String),
    RateLimited,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Database(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Message of a storage error without the variant prefix.
fn storage_message(err: Error) -> String {
    match err {
        Error::Database(e) => e.to_string(),
        Error::Storage(msg) | Error::Internal(msg) => msg,
        other => other.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, storage_message(err)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please wait before retrying.".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
