//! Commission Type Definitions
//!
//! All types follow these naming conventions:
//! - snake_case for field names
//! - *_id suffix for primary keys
//! - *_handle suffix for sponsorship references

pub mod account;
pub mod common;
pub mod event;
pub mod settings;

// Re-export common types
pub use common::{AccountId, CommissionCategory, Handle, PackageId, Role};

// Re-export account types
pub use account::{Account, Package};

// Re-export event types
pub use event::{CommissionEvent, CommissionKind, CommissionLevel, LedgerId, MAX_COMMISSION_LEVEL};

// Re-export settings types
pub use settings::{CommissionLevelSetting, CommissionTable, CommissionTables, LEVELS_PER_TABLE};
