//! Error types for submission pipeline operations.
//!
//! Splits failures into the retryable transport conditions the guard
//! converts into queue retention, and everything else, which propagates.

use std::time::Duration;

use checkpost_core::CoreError;
use thiserror::Error;

/// Result type alias for submission operations.
pub type Result<T> = std::result::Result<T, SubmitError>;

/// Failures arising while submitting records to the recording service.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    /// Network-level connectivity failure.
    #[error("network request failed: {message}")]
    Network {
        /// Description of the connection failure.
        message: String,
    },

    /// The guarded time bound elapsed before the remote call finished.
    #[error("timeout after {after:?}")]
    Timeout {
        /// The time bound that elapsed.
        after: Duration,
    },

    /// The service answered with something that is not a well-formed reply.
    #[error("malformed service reply: {message}")]
    InvalidReply {
        /// Description of the parse failure.
        message: String,
    },

    /// The durable queue's storage failed; fatal, never retried internally.
    #[error("queue storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// Pipeline construction was handed unusable settings.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// Unexpected internal failure.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal failure.
        message: String,
    },
}

impl SubmitError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error for the elapsed bound.
    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// Creates a malformed-reply error from a message.
    pub fn invalid_reply(message: impl Into<String>) -> Self {
        Self::InvalidReply { message: message.into() }
    }

    /// Creates a storage error from a message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage { message: message.into() }
    }

    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Creates an internal error from a message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Whether this failure is a retryable transport condition.
    ///
    /// Only timeouts and network failures qualify; the guard converts these
    /// into queue retention. Everything else, including service replies the
    /// pipeline cannot parse, propagates unsuppressed.
    pub fn is_retryable_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

impl From<CoreError> for SubmitError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Storage(message) | CoreError::Serialization(message) => {
                Self::Storage { message }
            },
            CoreError::InvalidInput(message) => Self::Configuration { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_are_retryable() {
        assert!(SubmitError::network("connection refused").is_retryable_transport());
        assert!(SubmitError::timeout(Duration::from_secs(10)).is_retryable_transport());
    }

    #[test]
    fn other_failures_are_not_retryable() {
        assert!(!SubmitError::invalid_reply("not json").is_retryable_transport());
        assert!(!SubmitError::storage("disk full").is_retryable_transport());
        assert!(!SubmitError::configuration("bad url").is_retryable_transport());
        assert!(!SubmitError::internal("task died").is_retryable_transport());
    }

    #[test]
    fn core_errors_map_into_the_pipeline_taxonomy() {
        let mapped = SubmitError::from(CoreError::storage("write failed"));
        assert!(matches!(mapped, SubmitError::Storage { .. }));

        let mapped = SubmitError::from(CoreError::serialization("bad json"));
        assert!(matches!(mapped, SubmitError::Storage { .. }));
    }
}
