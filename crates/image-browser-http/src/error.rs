//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use image_browser::ServeError;
use thiserror::Error;

/// Errors returned by the browser endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed listing request; rendered as `{"error": "..."}`
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,
}

impl From<ServeError> for ApiError {
    fn from(err: ServeError) -> Self {
        match err {
            ServeError::NotFound => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    }
}
