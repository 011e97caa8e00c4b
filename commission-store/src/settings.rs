//! Commission table configuration
//!
//! Tables live under `commission_levels:{category}`. A missing or malformed
//! value never fails a read; the category default is used instead.

use commission_core::{CommissionCategory, CommissionTable, CommissionTables};
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// Key prefix for commission tables
pub const COMMISSION_LEVELS_PREFIX: &str = "commission_levels:";

/// Store key for a category's table
pub fn settings_key(category: CommissionCategory) -> String {
    format!("{}{}", COMMISSION_LEVELS_PREFIX, category.name())
}

/// Commission table repository
pub struct SettingsRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Table for one category, falling back to its default
    pub async fn load_table(&self, category: CommissionCategory) -> StoreResult<CommissionTable> {
        let key = settings_key(category);
        let value = self.store.get(&key).await?;
        Ok(CommissionTable::from_stored_or_default(value.as_ref(), category))
    }

    /// Tables for both categories
    pub async fn load_tables(&self) -> StoreResult<CommissionTables> {
        let affiliate = self.load_table(CommissionCategory::Affiliate).await?;
        let consumer = self.load_table(CommissionCategory::Consumer).await?;
        Ok(CommissionTables::new(affiliate, consumer))
    }

    /// Like [`load_tables`](Self::load_tables), but a store failure also
    /// degrades to the defaults
    pub async fn load_tables_or_default(&self) -> CommissionTables {
        match self.load_tables().await {
            Ok(tables) => tables,
            Err(e) => {
                warn!(error = %e, "Failed to load commission tables, using defaults");
                CommissionTables::default()
            }
        }
    }

    /// Persist a category's table
    pub async fn save_table(
        &self,
        category: CommissionCategory,
        table: &CommissionTable,
    ) -> StoreResult<()> {
        let key = settings_key(category);
        self.store.set(&key, serde_json::to_value(table)?).await?;
        info!(key = %key, "Saved commission table");
        Ok(())
    }

    /// Drop a stored table so the default applies again
    pub async fn reset_table(&self, category: CommissionCategory) -> StoreResult<bool> {
        let key = settings_key(category);
        let removed = self.store.delete(&key).await?;
        info!(key = %key, removed, "Reset commission table");
        Ok(removed)
    }
}
