//! Record store error types

use thiserror::Error;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] turso::Error),

    /// Reading not found
    #[error("reading not found: {id}")]
    NotFound { id: String },

    /// JSON serialization error (the untyped `value` column)
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The persistence layer could not be reached at startup
    #[error("store unavailable")]
    Unavailable,
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Result type for record store operations
pub type Result<T> = std::result::Result<T, StoreError>;
