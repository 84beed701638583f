//! Error types for foundational operations.
//!
//! Covers queue storage and serialization faults. Pipeline-level failures
//! (network, timeout, malformed replies) live in the submission crate; this
//! taxonomy is for the pieces everything else builds on.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error type for foundational operations.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// Reading or writing persistent storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Persisted state could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Caller supplied input that cannot be used.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Creates a storage error from a message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a serialization error from a message.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates an invalid-input error from a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
