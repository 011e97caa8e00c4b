//! Commission Error Codes Registry
//!
//! Error code format: COM-{area}-{sequence}
//! - COM-CFG: Commission table configuration errors
//! - COM-LEVEL: Commission level errors
//! - COM-LEDGER: Payments ledger errors
//! - COM-XFER: Transfer errors
//!
//! The aggregator itself never returns these; unresolvable references are
//! skipped. Errors surface only from configuration parsing, ledger id
//! parsing and transfer validation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Commission Result type
pub type CommissionResult<T> = Result<T, CommissionError>;

/// Commission Error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommissionError {
    // ============================================================
    // Configuration Errors (COM-CFG-*)
    // ============================================================
    /// [COM-CFG-001] Commission table does not have exactly four levels
    #[error("[COM-CFG-001] Commission table {category} has {actual} levels, expected {expected}")]
    InvalidLevelCount {
        category: String,
        expected: usize,
        actual: usize,
    },

    /// [COM-CFG-002] Percentage outside 0-100
    #[error("[COM-CFG-002] Level {level} percentage {percentage} outside 0-100")]
    PercentageOutOfRange { level: usize, percentage: Decimal },

    /// [COM-CFG-003] Stored commission table is not an array
    #[error("[COM-CFG-003] Stored commission table {category} is not an array")]
    SettingsNotArray { category: String },

    /// [COM-CFG-004] Unknown role or category name
    #[error("[COM-CFG-004] Unknown role or category {name}")]
    UnknownRole { name: String },

    // ============================================================
    // Level Errors (COM-LEVEL-*)
    // ============================================================
    /// [COM-LEVEL-001] Level outside 1-4
    #[error("[COM-LEVEL-001] Commission level {level} outside 1-4")]
    InvalidLevel { level: u8 },

    // ============================================================
    // Ledger Errors (COM-LEDGER-*)
    // ============================================================
    /// [COM-LEDGER-001] Malformed ledger id
    #[error("[COM-LEDGER-001] Malformed ledger id {id}, expected com-<purchaser>-l<level>")]
    InvalidLedgerId { id: String },

    /// [COM-LEDGER-002] Unknown payment status
    #[error("[COM-LEDGER-002] Unknown payment status {status}")]
    InvalidPaymentStatus { status: String },

    // ============================================================
    // Transfer Errors (COM-XFER-*)
    // ============================================================
    /// [COM-XFER-001] Non-positive or malformed amount
    #[error("[COM-XFER-001] Invalid transfer amount: {reason}")]
    InvalidAmount { reason: String },

    /// [COM-XFER-002] Sender and recipient are the same account
    #[error("[COM-XFER-002] Account {account_id} cannot transfer to itself")]
    SelfTransfer { account_id: String },

    /// [COM-XFER-003] Balance too low
    #[error("[COM-XFER-003] Insufficient balance in {account_id}: required {required}, available {available}")]
    InsufficientBalance {
        account_id: String,
        required: Decimal,
        available: Decimal,
    },

    // ============================================================
    // General Errors
    // ============================================================
    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl CommissionError {
    /// Registry code of this error, if it has one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CommissionError::InvalidLevelCount { .. } => Some("COM-CFG-001"),
            CommissionError::PercentageOutOfRange { .. } => Some("COM-CFG-002"),
            CommissionError::SettingsNotArray { .. } => Some("COM-CFG-003"),
            CommissionError::UnknownRole { .. } => Some("COM-CFG-004"),
            CommissionError::InvalidLevel { .. } => Some("COM-LEVEL-001"),
            CommissionError::InvalidLedgerId { .. } => Some("COM-LEDGER-001"),
            CommissionError::InvalidPaymentStatus { .. } => Some("COM-LEDGER-002"),
            CommissionError::InvalidAmount { .. } => Some("COM-XFER-001"),
            CommissionError::SelfTransfer { .. } => Some("COM-XFER-002"),
            CommissionError::InsufficientBalance { .. } => Some("COM-XFER-003"),
            CommissionError::SerializationError(_) | CommissionError::NotFound { .. } => None,
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CommissionError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for CommissionError {
    fn from(err: serde_json::Error) -> Self {
        CommissionError::SerializationError(err.to_string())
    }
}
