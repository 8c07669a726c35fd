//! API error types with JSON responses.
//!
//! Service errors carry a stable, grepable code via [`ErrorCode`]; the
//! HTTP layer turns them into `{"error": <code>, "message": <text>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::services::board::BoardError;

/// Stable machine-readable code for an error.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

/// Error returned from route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("invalid version: {0}")]
    InvalidVersion(String),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Board(e) => e.error_code(),
            Self::InvalidVersion(_) => "E_INVALID_VERSION",
        }
    }
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Board(BoardError::BoardNotFound(_) | BoardError::ItemNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Board(BoardError::InvalidInput(_)) | Self::InvalidVersion(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        debug!(code, %status, error = %self, "request failed");

        let body = ErrorResponse { error: code.to_owned(), message: self.to_string() };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
