//! Payment status overrides
//!
//! Stored as `payment_status:{ledger id}` -> status. Rows without an entry
//! are pending.

use commission_core::{LedgerId, PaymentStatus};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// Key prefix for payment status overrides
pub const PAYMENT_STATUS_PREFIX: &str = "payment_status:";

/// Key prefix for dashboard flags
pub const DASHBOARD_PREFIX: &str = "dashboard:";

fn status_key(ledger_id: &LedgerId) -> String {
    format!("{}{}", PAYMENT_STATUS_PREFIX, ledger_id)
}

/// Payment status repository
pub struct PaymentStatusRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> PaymentStatusRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Override for one ledger row.
    ///
    /// A malformed stored value reads as no override, as in [`load_all`](Self::load_all).
    pub async fn get(&self, ledger_id: &LedgerId) -> StoreResult<Option<PaymentStatus>> {
        let Some(value) = self.store.get(&status_key(ledger_id)).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(status) => Ok(Some(status)),
            Err(e) => {
                warn!(ledger_id = %ledger_id, error = %e, "Ignoring malformed payment status");
                Ok(None)
            }
        }
    }

    /// Set a row's status
    pub async fn set(&self, ledger_id: &LedgerId, status: PaymentStatus) -> StoreResult<()> {
        self.store
            .set(&status_key(ledger_id), serde_json::to_value(status)?)
            .await?;
        info!(ledger_id = %ledger_id, status = %status, "Set payment status");
        Ok(())
    }

    /// Remove a row's override; it reads as pending again
    pub async fn clear(&self, ledger_id: &LedgerId) -> StoreResult<bool> {
        self.store.delete(&status_key(ledger_id)).await
    }

    /// Every stored override.
    ///
    /// Entries with a malformed key or value are skipped.
    pub async fn load_all(&self) -> StoreResult<HashMap<LedgerId, PaymentStatus>> {
        let mut statuses = HashMap::new();
        for (key, value) in self.store.list_prefix(PAYMENT_STATUS_PREFIX).await? {
            let parsed = key
                .strip_prefix(PAYMENT_STATUS_PREFIX)
                .and_then(|raw_id| LedgerId::parse(raw_id).ok())
                .zip(serde_json::from_value::<PaymentStatus>(value).ok());
            match parsed {
                Some((ledger_id, status)) => {
                    statuses.insert(ledger_id, status);
                }
                None => warn!(key = %key, "Skipping malformed payment status"),
            }
        }
        Ok(statuses)
    }

    /// Drop every override and dashboard flag
    pub async fn reset_all(&self) -> StoreResult<usize> {
        let statuses = self.store.delete_prefix(PAYMENT_STATUS_PREFIX).await?;
        let flags = self.store.delete_prefix(DASHBOARD_PREFIX).await?;
        info!(statuses, flags, "Reset payment statuses");
        Ok(statuses + flags)
    }
}
