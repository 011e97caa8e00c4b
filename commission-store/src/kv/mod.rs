//! Key-Value Store
//!
//! Small string-keyed JSON store used for commission tables, payment
//! status overrides and dashboard flags. Keys are namespaced by prefix
//! (`commission_levels:`, `payment_status:`, `dashboard:`).

pub mod memory;
pub mod sled;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::StoreResult;

/// Key-value store interface
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Remove `key`; returns whether it existed
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Remove every key starting with `prefix`; returns how many were removed
    async fn delete_prefix(&self, prefix: &str) -> StoreResult<usize>;

    /// Every entry whose key starts with `prefix`, ordered by key
    async fn list_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, Value)>>;
}

/// Typed read
pub async fn get_typed<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Typed write
pub async fn set_typed<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    store.set(key, serde_json::to_value(value)?).await
}

/// Open the store described by `config`
pub fn open_store(config: &StoreConfig) -> StoreResult<Box<dyn KeyValueStore>> {
    match &config.data_dir {
        Some(dir) => Ok(Box::new(SledStore::open_with(dir, config.flush_on_write)?)),
        None => Ok(Box::new(MemoryStore::new())),
    }
}

pub use memory::MemoryStore;
pub use self::sled::SledStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_typed_helpers() {
        let store = MemoryStore::new();
        set_typed(&store, "dashboard:reset", &true).await.unwrap();

        let flag: Option<bool> = get_typed(&store, "dashboard:reset").await.unwrap();
        assert_eq!(flag, Some(true));

        let missing: Option<bool> = get_typed(&store, "dashboard:other").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_typed_read_wrong_shape() {
        let store = MemoryStore::new();
        store.set("k", serde_json::json!("text")).await.unwrap();
        assert!(get_typed::<u32>(&store, "k").await.is_err());
    }

    #[test]
    fn test_open_in_memory() {
        assert!(open_store(&StoreConfig::test()).is_ok());
    }
}
