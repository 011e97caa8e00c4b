//! CLI Error Types

use commission_core::CommissionError;
use commission_store::StoreError;
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

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Store error
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Core error
    #[error("{0}")]
    CoreError(#[from] CommissionError),
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

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigError { .. } => 1,
            CliError::InvalidArgument { .. } => 2,
            CliError::IoError(_) => 5,
            CliError::JsonError(_) => 6,
            CliError::StoreError(StoreError::PermissionDenied { .. }) => 13,
            CliError::StoreError(StoreError::NotFound { .. }) => 21,
            CliError::StoreError(StoreError::Core(_)) => 12,
            CliError::StoreError(_) => 31,
            CliError::CoreError(_) => 12,
        }
    }
}
