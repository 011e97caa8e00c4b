//! Downline Loader
//!
//! Fetches a beneficiary's downline from an [`AccountDirectory`] one level
//! at a time. Each level's handles are split into chunks of at most
//! [`MAX_IN_QUERY_HANDLES`], queried concurrently and merged before the
//! next level starts.

use commission_core::{Account, DownlineLevels, DownlineWalk, PackageCatalog, SponsorIndex};
use futures::future::try_join_all;
use tracing::debug;

use crate::directory::{AccountDirectory, MAX_IN_QUERY_HANDLES};
use crate::error::StoreResult;

/// Level-by-level downline loader
pub struct DownlineLoader<'a> {
    directory: &'a dyn AccountDirectory,
}

impl<'a> DownlineLoader<'a> {
    pub fn new(directory: &'a dyn AccountDirectory) -> Self {
        Self { directory }
    }

    /// Downline below `beneficiary`, at most four levels
    pub async fn load_downline(&self, beneficiary: &Account) -> StoreResult<DownlineLevels> {
        let mut walk = DownlineWalk::new(beneficiary);

        while let Some(level) = walk.next_level() {
            let queries = walk
                .frontier()
                .chunks(MAX_IN_QUERY_HANDLES)
                .map(|chunk| self.directory.find_by_sponsor_handles(chunk));
            let batches = try_join_all(queries).await?;
            let found: Vec<Account> = batches.into_iter().flatten().collect();

            debug!(
                beneficiary = %beneficiary.account_id,
                level = level.get(),
                handles = walk.frontier().len(),
                found = found.len(),
                "Loaded downline level"
            );
            walk.advance(found);
        }

        Ok(walk.finish())
    }

    /// Every account, indexed for the global view
    pub async fn load_index(&self) -> StoreResult<SponsorIndex> {
        Ok(SponsorIndex::new(self.directory.list_accounts().await?))
    }

    /// Every package
    pub async fn load_catalog(&self) -> StoreResult<PackageCatalog> {
        Ok(PackageCatalog::new(self.directory.list_packages().await?))
    }
}
