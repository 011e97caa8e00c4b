//! Sled-backed key-value store

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// Tree holding all commission keys
const KV_TREE: &str = "commission_kv";

/// Sled-backed store
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    tree: sled::Tree,
    flush_on_write: bool,
}

impl SledStore {
    /// Open or create a store at `path`, flushing after every write
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::open_with(path, true)
    }

    /// Open or create a store at `path`
    pub fn open_with<P: AsRef<Path>>(path: P, flush_on_write: bool) -> StoreResult<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| open_error(e, path.as_ref()))?;
        let tree = db
            .open_tree(KV_TREE)
            .map_err(|e| StoreError::Storage(format!("Failed to open {} tree: {}", KV_TREE, e)))?;

        debug!(path = %path.as_ref().display(), "Opened sled store");
        Ok(Self {
            db,
            tree,
            flush_on_write,
        })
    }

    /// Flush to disk
    pub fn flush(&self) -> StoreResult<()> {
        self.db
            .flush()
            .map_err(|e| StoreError::Storage(format!("Failed to flush db: {}", e)))?;
        Ok(())
    }

    fn after_write(&self) -> StoreResult<()> {
        if self.flush_on_write {
            self.flush()?;
        }
        Ok(())
    }

    fn decode(bytes: &[u8]) -> StoreResult<Value> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode_key(bytes: &[u8]) -> StoreResult<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| StoreError::Serialization(format!("Non UTF-8 key: {}", e)))
    }
}

fn open_error(e: sled::Error, path: &Path) -> StoreError {
    match StoreError::from(e) {
        StoreError::PermissionDenied { operation, .. } => StoreError::PermissionDenied {
            operation,
            key: path.display().to_string(),
        },
        StoreError::Storage(msg) => {
            StoreError::Storage(format!("Failed to open sled db at {}: {}", path.display(), msg))
        }
        other => other,
    }
}

#[async_trait]
impl KeyValueStore for SledStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        match self.tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let bytes = serde_json::to_vec(&value)?;
        self.tree.insert(key.as_bytes(), bytes)?;
        self.after_write()
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let existed = self.tree.remove(key.as_bytes())?.is_some();
        self.after_write()?;
        Ok(existed)
    }

    async fn delete_prefix(&self, prefix: &str) -> StoreResult<usize> {
        let mut removed = 0;
        for item in self.tree.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            self.tree.remove(key)?;
            removed += 1;
        }
        self.after_write()?;
        Ok(removed)
    }

    async fn list_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, Value)>> {
        let mut entries = Vec::new();
        for item in self.tree.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            entries.push((Self::decode_key(&key)?, Self::decode(&value)?));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sled_crud() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();

        store.set("commission_levels:consumer", json!([{"percentage": 20}])).await.unwrap();
        let value = store.get("commission_levels:consumer").await.unwrap();
        assert_eq!(value, Some(json!([{"percentage": 20}])));

        assert!(store.delete("commission_levels:consumer").await.unwrap());
        assert_eq!(store.get("commission_levels:consumer").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sled_prefix_ops() {
        let dir = tempdir().unwrap();
        let store = SledStore::open_with(dir.path(), false).unwrap();

        store.set("payment_status:com-b-l2", json!("paid")).await.unwrap();
        store.set("payment_status:com-a-l1", json!("pending")).await.unwrap();
        store.set("dashboard:reset", json!(true)).await.unwrap();

        let listed = store.list_prefix("payment_status:").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].0, "payment_status:com-a-l1");

        assert_eq!(store.delete_prefix("payment_status:").await.unwrap(), 2);
        assert!(store.list_prefix("payment_status:").await.unwrap().is_empty());
        assert!(store.get("dashboard:reset").await.unwrap().is_some());
    }
}
