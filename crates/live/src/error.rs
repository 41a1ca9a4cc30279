//! Error types for the live broadcast crate

use thiserror::Error;

/// Errors that can occur in the broadcast system
#[derive(Error, Debug)]
pub enum LiveError {
    /// Maximum subscribers reached
    #[error("maximum subscribers reached ({max})")]
    MaxSubscribers { max: usize },

    /// Subscriber not found
    #[error("subscriber not found: {id}")]
    SubscriberNotFound { id: u64 },
}

/// Result type for broadcast operations
pub type Result<T> = std::result::Result<T, LiveError>;
