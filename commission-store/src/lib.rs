//! Referral Commission Store
//!
//! Persistence and orchestration around `commission-core`:
//! - [`KeyValueStore`]: injected key-value store ([`MemoryStore`], [`SledStore`])
//! - [`SettingsRepository`]: commission tables with fallback defaults
//! - [`PaymentStatusRepository`]: payment status overrides by ledger id
//! - [`AccountDirectory`]: accounts and packages, sponsor queries capped at
//!   [`MAX_IN_QUERY_HANDLES`] handles
//! - [`DownlineLoader`]: chunked level-by-level downline retrieval
//! - [`CommissionService`]: refresh, ledger, balances and transfers

pub mod config;
pub mod directory;
pub mod error;
pub mod kv;
pub mod loader;
pub mod service;
pub mod settings;
pub mod status;

pub use config::StoreConfig;
pub use directory::{AccountDirectory, MemoryDirectory, Snapshot, MAX_IN_QUERY_HANDLES};
pub use error::{StoreError, StoreResult};
pub use kv::{get_typed, open_store, set_typed, KeyValueStore, MemoryStore, SledStore};
pub use loader::DownlineLoader;
pub use service::{CommissionReport, CommissionService, ReportScope};
pub use settings::{settings_key, SettingsRepository, COMMISSION_LEVELS_PREFIX};
pub use status::{PaymentStatusRepository, DASHBOARD_PREFIX, PAYMENT_STATUS_PREFIX};
