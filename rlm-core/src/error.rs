//! Retention Lifecycle Error Types

use thiserror::Error;

use crate::access::AccessLevel;
use crate::types::Role;

/// Retention lifecycle errors
#[derive(Debug, Error)]
pub enum RetentionError {
    /// Actor role does not satisfy the required access level
    #[error("Authorization failed: {operation} requires {required} access (role: {role})")]
    Authorization {
        operation: String,
        required: AccessLevel,
        role: Role,
    },

    /// Malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced entity absent from the local cache
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Operation blocked by dependent state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend call returned non-success or was unreachable
    #[error("Persistence failed during {operation}: {message}")]
    Persistence { operation: String, message: String },

    /// Legal hold has already been released
    #[error("Legal hold already released: {0}")]
    AlreadyReleased(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Retention result type
pub type RetentionResult<T> = Result<T, RetentionError>;

impl RetentionError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        RetentionError::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        RetentionError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        RetentionError::Conflict(message.into())
    }

    /// Create a persistence error
    pub fn persistence(operation: impl Into<String>, message: impl Into<String>) -> Self {
        RetentionError::Persistence {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        RetentionError::Configuration(message.into())
    }

    /// Whether the error was raised before any I/O was attempted
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            RetentionError::Persistence { .. } | RetentionError::Conflict(_)
        )
    }
}
