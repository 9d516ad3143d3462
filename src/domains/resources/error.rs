//! Resource-specific error types.

use thiserror::Error;

/// A specialized Result type for resource store operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Errors that can occur during resource operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// No resource with the given id exists (or it was deleted).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A supplied field value is outside what the store accepts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResourceError {
    /// Create a new "not found" error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a new "invalid argument" error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
