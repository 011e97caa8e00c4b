//! Referral Commission Core
//!
//! Computes multi-level referral commissions for a membership platform.
//! Every account may name a sponsor by handle; a purchase by an account
//! pays commission to up to four sponsors above it.
//!
//! # Rules
//!
//! | Rule | Behaviour |
//! |------|-----------|
//! | **Depth** | Levels 1-4 only, cycle-safe walks |
//! | **Base** | `activation_fee - discount_applied`, fee must be positive |
//! | **Amount** | `base * percentage / 100`, only for active levels, only when positive |
//! | **Kind** | Level 1 is a personal referral, levels 2-4 are team bonuses |
//! | **Tables** | One four-level table per category (affiliate, consumer) |
//!
//! # Views
//!
//! - [`compute_commissions`]: one beneficiary, walking down its downline.
//!   The beneficiary's role picks the table for every level.
//! - [`compute_all_commissions`]: every account, walking up from each
//!   purchaser. Each sponsor's own role picks the table for its hop.
//!
//! # Consumers
//!
//! - [`CommissionSummary`]: dashboard totals
//! - [`PaymentLedger`]: payments rows with persisted status
//! - [`BalanceSheet`] / [`plan_transfer`]: transfers balance
//!
//! The crate is pure and synchronous; persistence lives in
//! `commission-store`.

pub mod error;
pub mod types;
pub mod aggregator;
pub mod summary;
pub mod ledger;
pub mod transfer;

// Re-export error types
pub use error::{CommissionError, CommissionResult};

// Re-export all types
pub use types::*;

// Re-export aggregator
pub use aggregator::{
    commission_amount, compute_all_commissions, compute_commissions, upline_chain,
    CommissionAggregator, DownlineLevels, DownlineWalk, PackageCatalog, SponsorIndex,
};

// Re-export summary
pub use summary::{BeneficiaryTotal, CommissionSummary, LevelTotal};

// Re-export ledger
pub use ledger::{LedgerEntry, PaymentLedger, PaymentStatus};

// Re-export transfer
pub use transfer::{plan_transfer, BalanceSheet, TransferPlan};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
