//! API error types
//!
//! Provides structured error responses for the HTTP API. Client-facing
//! messages stay generic; the specific cause is logged when the response is
//! built.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use sonda_store::StoreError;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Payload failed to validate or persist. Deliberately carries no
    /// field-level diagnostics.
    #[error("invalid reading payload")]
    InvalidInput,

    /// Internal server error (store failures included)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a not found error for a reading id
    pub fn not_found(id: &str) -> Self {
        Self::NotFound(format!("reading '{}' not found", id))
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Read-path store failures: a missing record maps to 404, everything else
/// is a generic server error. The write path overrides this mapping where
/// persistence failures must surface as 400 instead.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::not_found(&id),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code (machine-readable)
    pub error: &'static str,
    /// Error message (human-readable)
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };

        tracing::warn!(
            error_code = body.error,
            error_message = %body.message,
            status = %status,
            "API error"
        );

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
