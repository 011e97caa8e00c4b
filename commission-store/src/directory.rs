//! Account Directory
//!
//! Read access to accounts and packages owned by an external document
//! store. Sponsor lookups are `in`-style queries capped at
//! [`MAX_IN_QUERY_HANDLES`] handles per call.

use async_trait::async_trait;
use commission_core::{Account, AccountId, Handle, Package, PackageId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Most handles one sponsor query may carry
pub const MAX_IN_QUERY_HANDLES: usize = 30;

/// Account directory interface
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Accounts whose sponsor handle is one of `handles`.
    ///
    /// Fails with [`StoreError::QueryLimitExceeded`] for more than
    /// [`MAX_IN_QUERY_HANDLES`] handles.
    async fn find_by_sponsor_handles(&self, handles: &[Handle]) -> StoreResult<Vec<Account>>;

    /// Account by id
    async fn get_account(&self, account_id: &AccountId) -> StoreResult<Option<Account>>;

    /// Every account
    async fn list_accounts(&self) -> StoreResult<Vec<Account>>;

    /// Package by id
    async fn get_package(&self, package_id: &PackageId) -> StoreResult<Option<Package>>;

    /// Every package
    async fn list_packages(&self) -> StoreResult<Vec<Package>>;

    /// Insert or replace an account
    async fn save_account(&self, account: &Account) -> StoreResult<()>;
}

/// Accounts and packages as exported from the document store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                StoreError::permission_denied("read", path.display().to_string())
            }
            std::io::ErrorKind::NotFound => {
                StoreError::not_found("Snapshot", path.display().to_string())
            }
            _ => StoreError::Storage(format!("Failed to read {}: {}", path.display(), e)),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the snapshot back as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, bytes).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                StoreError::permission_denied("write", path.display().to_string())
            }
            _ => StoreError::Storage(format!("Failed to write {}: {}", path.display(), e)),
        })
    }
}

/// In-memory directory
///
/// Keeps accounts in insertion order so duplicate handles resolve the same
/// way on every run.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    accounts: Arc<RwLock<Vec<Account>>>,
    packages: Arc<RwLock<HashMap<PackageId, Package>>>,
}

impl MemoryDirectory {
    pub fn new(
        accounts: impl IntoIterator<Item = Account>,
        packages: impl IntoIterator<Item = Package>,
    ) -> Self {
        Self {
            accounts: Arc::new(RwLock::new(accounts.into_iter().collect())),
            packages: Arc::new(RwLock::new(
                packages
                    .into_iter()
                    .map(|p| (p.package_id.clone(), p))
                    .collect(),
            )),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::new(snapshot.accounts, snapshot.packages)
    }

    /// Current contents as a snapshot, packages ordered by id
    pub async fn to_snapshot(&self) -> Snapshot {
        let accounts = self.accounts.read().await.clone();
        let mut packages: Vec<Package> = self.packages.read().await.values().cloned().collect();
        packages.sort_by(|a, b| a.package_id.cmp(&b.package_id));
        Snapshot { accounts, packages }
    }
}

#[async_trait]
impl AccountDirectory for MemoryDirectory {
    async fn find_by_sponsor_handles(&self, handles: &[Handle]) -> StoreResult<Vec<Account>> {
        if handles.len() > MAX_IN_QUERY_HANDLES {
            return Err(StoreError::QueryLimitExceeded {
                requested: handles.len(),
                limit: MAX_IN_QUERY_HANDLES,
            });
        }
        let wanted: HashSet<&Handle> = handles.iter().collect();
        let accounts = self.accounts.read().await;
        let found: Vec<Account> = accounts
            .iter()
            .filter(|a| a.sponsor().map(|s| wanted.contains(s)).unwrap_or(false))
            .cloned()
            .collect();
        debug!(handles = handles.len(), found = found.len(), "Sponsor handle query");
        Ok(found)
    }

    async fn get_account(&self, account_id: &AccountId) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| &a.account_id == account_id).cloned())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        Ok(self.accounts.read().await.clone())
    }

    async fn get_package(&self, package_id: &PackageId) -> StoreResult<Option<Package>> {
        Ok(self.packages.read().await.get(package_id).cloned())
    }

    async fn list_packages(&self) -> StoreResult<Vec<Package>> {
        let mut packages: Vec<Package> = self.packages.read().await.values().cloned().collect();
        packages.sort_by(|a, b| a.package_id.cmp(&b.package_id));
        Ok(packages)
    }

    async fn save_account(&self, account: &Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|a| a.account_id == account.account_id) {
            Some(existing) => *existing = account.clone(),
            None => accounts.push(account.clone()),
        }
        Ok(())
    }
}
