//! CLI Error Types

use rlm_core::RetentionError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Entity absent from the session cache
    #[error("Not found: {id}")]
    NotFound { id: String },

    /// Lifecycle operation failed
    #[error(transparent)]
    Retention(#[from] RetentionError),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        CliError::ConfigError {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_arg(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        CliError::NotFound { id: id.into() }
    }

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigError { .. } => 1,
            CliError::InvalidArgument { .. } => 2,
            CliError::NotFound { .. } => 21,
            CliError::Retention(e) => match e {
                RetentionError::Configuration(_) => 1,
                RetentionError::Validation(_) => 2,
                RetentionError::Persistence { .. } => 4,
                RetentionError::Authorization { .. } => 13,
                RetentionError::NotFound { .. } => 21,
                RetentionError::Conflict(_) => 23,
                RetentionError::AlreadyReleased(_) => 24,
            },
            CliError::IoError(_) => 5,
            CliError::JsonError(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlm_core::{AccessLevel, Role};

    #[test]
    fn test_config_error() {
        let err = CliError::config("Missing actor id");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Missing actor id"));
    }

    #[test]
    fn test_retention_exit_codes() {
        let denied: CliError = RetentionError::Authorization {
            operation: "delete retention policy".to_string(),
            required: AccessLevel::Admin,
            role: Role::Auditor,
        }
        .into();
        assert_eq!(denied.exit_code(), 13);
        assert!(denied.to_string().contains("auditor"));

        let cases = [
            (RetentionError::validation("bad"), 2),
            (RetentionError::not_found("Legal hold", "LH-1"), 21),
            (RetentionError::conflict("in use"), 23),
            (RetentionError::persistence("create policy", "HTTP 500"), 4),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from(err).exit_code(), code);
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = CliError::not_found("RP-9");
        assert_eq!(err.exit_code(), 21);
        assert_eq!(err.to_string(), "Not found: RP-9");
    }
}
