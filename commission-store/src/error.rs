//! Store error types

use commission_core::CommissionError;
use thiserror::Error;

/// Store Result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Store Error type
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend I/O failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend refused the operation
    #[error("Permission denied: {operation} on {key}")]
    PermissionDenied { operation: String, key: String },

    /// Too many handles in one directory query
    #[error("Query limit exceeded: {requested} handles, limit {limit}")]
    QueryLimitExceeded { requested: usize, limit: usize },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Domain error
    #[error(transparent)]
    Core(#[from] CommissionError),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn permission_denied(operation: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::PermissionDenied {
            operation: operation.into(),
            key: key.into(),
        }
    }

    /// Shown as a persistent banner rather than degraded to empty data
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::PermissionDenied { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        match e {
            sled::Error::Io(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
                StoreError::permission_denied("io", io.to_string())
            }
            other => StoreError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_transparent() {
        let err: StoreError = CommissionError::InvalidLevel { level: 9 }.into();
        assert!(err.to_string().starts_with("[COM-LEVEL-001]"));
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_permission_denied() {
        let err = StoreError::permission_denied("set", "commission_levels:affiliate");
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("commission_levels:affiliate"));
    }
}
