//! Commission Service
//!
//! Ties the directory, configuration and status stores to the aggregator.

use chrono::{DateTime, Utc};
use commission_core::{
    plan_transfer, Account, AccountId, BalanceSheet, CommissionAggregator, CommissionEvent,
    CommissionSummary, CommissionTables, DownlineLevels, LedgerId, PackageCatalog, PaymentLedger,
    PaymentStatus, TransferPlan,
};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{error, info, warn};

use crate::directory::AccountDirectory;
use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use crate::loader::DownlineLoader;
use crate::settings::SettingsRepository;
use crate::status::PaymentStatusRepository;

/// What a report covers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "account_id", rename_all = "snake_case")]
pub enum ReportScope {
    /// One beneficiary's downline
    Beneficiary(AccountId),
    /// Every account
    Global,
}

/// Result of one refresh
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommissionReport {
    pub scope: ReportScope,
    pub generated_at: DateTime<Utc>,
    pub tables: CommissionTables,
    pub events: Vec<CommissionEvent>,
    pub summary: CommissionSummary,
    pub ledger: PaymentLedger,
}

impl CommissionReport {
    /// Report with no events, shown when a refresh fails
    pub fn empty(scope: ReportScope, tables: CommissionTables) -> Self {
        Self::build(scope, tables, Vec::new(), PaymentLedger::default())
    }

    fn build(
        scope: ReportScope,
        tables: CommissionTables,
        events: Vec<CommissionEvent>,
        ledger: PaymentLedger,
    ) -> Self {
        let summary = CommissionSummary::from_events(&events);
        Self {
            scope,
            generated_at: Utc::now(),
            tables,
            events,
            summary,
            ledger,
        }
    }
}

/// Commission service
pub struct CommissionService<'a> {
    store: &'a dyn KeyValueStore,
    directory: &'a dyn AccountDirectory,
}

impl<'a> CommissionService<'a> {
    pub fn new(store: &'a dyn KeyValueStore, directory: &'a dyn AccountDirectory) -> Self {
        Self { store, directory }
    }

    pub fn settings(&self) -> SettingsRepository<'a> {
        SettingsRepository::new(self.store)
    }

    pub fn statuses(&self) -> PaymentStatusRepository<'a> {
        PaymentStatusRepository::new(self.store)
    }

    fn loader(&self) -> DownlineLoader<'a> {
        DownlineLoader::new(self.directory)
    }

    async fn require_account(&self, account_id: &AccountId) -> StoreResult<Account> {
        self.directory
            .get_account(account_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Account", account_id.as_str()))
    }

    /// Packages selected anywhere in `downline`, fetched concurrently
    async fn packages_for(&self, downline: &DownlineLevels) -> StoreResult<PackageCatalog> {
        let ids: BTreeSet<_> = downline
            .iter()
            .flat_map(|(_, accounts)| accounts.iter())
            .filter_map(|a| a.selected_package_id.clone())
            .collect();
        let packages = try_join_all(ids.iter().map(|id| self.directory.get_package(id))).await?;
        Ok(PackageCatalog::new(packages.into_iter().flatten()))
    }

    /// Commissions owed to one beneficiary
    pub async fn beneficiary_report(&self, account_id: &AccountId) -> StoreResult<CommissionReport> {
        let beneficiary = self.require_account(account_id).await?;
        self.report_for(&beneficiary).await
    }

    async fn report_for(&self, beneficiary: &Account) -> StoreResult<CommissionReport> {
        let account_id = &beneficiary.account_id;
        let tables = self.settings().load_tables().await?;
        let downline = self.loader().load_downline(beneficiary).await?;
        let packages = self.packages_for(&downline).await?;

        let events = CommissionAggregator::new(&packages, &tables).for_downline(beneficiary, &downline);
        let statuses = self.statuses().load_all().await?;
        let ledger = PaymentLedger::build(&events, &statuses);

        info!(
            beneficiary = %account_id,
            count = events.len(),
            "Built beneficiary commission report"
        );
        Ok(CommissionReport::build(
            ReportScope::Beneficiary(account_id.clone()),
            tables,
            events,
            ledger,
        ))
    }

    /// Commissions owed to every account
    pub async fn global_report(&self) -> StoreResult<CommissionReport> {
        let tables = self.settings().load_tables().await?;
        let index = self.loader().load_index().await?;
        let packages = self.loader().load_catalog().await?;

        let events = CommissionAggregator::new(&packages, &tables).for_all(&index);
        let statuses = self.statuses().load_all().await?;
        let ledger = PaymentLedger::build(&events, &statuses);

        info!(
            accounts = index.len(),
            count = events.len(),
            "Built global commission report"
        );
        Ok(CommissionReport::build(ReportScope::Global, tables, events, ledger))
    }

    /// Commission and wallet balance of one account
    pub async fn balance(&self, account_id: &AccountId) -> StoreResult<BalanceSheet> {
        let account = self.require_account(account_id).await?;
        let report = self.report_for(&account).await?;
        Ok(BalanceSheet::for_account(&account, &report.events, &report.ledger))
    }

    /// Move `amount` between two wallets and persist both accounts.
    ///
    /// The sender is written first. If the recipient cannot be written the
    /// sender's previous balance is restored before the error is returned.
    pub async fn transfer(
        &self,
        from_id: &AccountId,
        to_id: &AccountId,
        amount: Decimal,
    ) -> StoreResult<TransferPlan> {
        let mut from = self.require_account(from_id).await?;
        let mut to = self.require_account(to_id).await?;
        let original_from = from.clone();

        let plan = plan_transfer(&from, &to, amount)?;
        plan.apply(&mut from, &mut to)?;
        self.directory.save_account(&from).await?;
        if let Err(e) = self.directory.save_account(&to).await {
            warn!(from = %from_id, to = %to_id, error = %e, "Recipient write failed, restoring sender");
            if let Err(rollback) = self.directory.save_account(&original_from).await {
                error!(
                    account_id = %from_id,
                    balance = %original_from.balance,
                    error = %rollback,
                    "Failed to restore sender balance"
                );
            }
            return Err(e);
        }

        info!(
            from = %from_id,
            to = %to_id,
            amount = %amount,
            "Transferred balance"
        );
        Ok(plan)
    }

    /// Override one ledger row's status
    pub async fn set_payment_status(
        &self,
        ledger_id: &LedgerId,
        status: PaymentStatus,
    ) -> StoreResult<()> {
        self.statuses().set(ledger_id, status).await
    }

    /// Drop every status override and dashboard flag
    pub async fn reset_dashboard(&self) -> StoreResult<usize> {
        self.statuses().reset_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use crate::kv::MemoryStore;
    use commission_core::{Handle, Package, PackageId, Role};

    fn directory() -> MemoryDirectory {
        MemoryDirectory::new(
            vec![
                Account::new(AccountId::new("B"), Role::Affiliate, Handle::new("bea"))
                    .with_balance(Decimal::new(100, 0)),
                Account::new(AccountId::new("P1"), Role::Consumer, Handle::new("pia"))
                    .with_sponsor(Handle::new("bea"))
                    .with_package(PackageId::new("pro")),
                Account::new(AccountId::new("P2"), Role::Consumer, Handle::new("pau"))
                    .with_sponsor(Handle::new("pia"))
                    .with_package(PackageId::new("basic"))
                    .with_discount(Decimal::new(25, 0)),
            ],
            vec![
                Package::new(PackageId::new("pro"), Decimal::new(475, 0), Role::Affiliate),
                Package::new(PackageId::new("basic"), Decimal::new(199, 0), Role::Consumer),
            ],
        )
    }

    #[tokio::test]
    async fn test_beneficiary_report() {
        let store = MemoryStore::new();
        let dir = directory();
        let service = CommissionService::new(&store, &dir);

        let report = service.beneficiary_report(&AccountId::new("B")).await.unwrap();
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.summary.total_revenue, Decimal::new(13615, 2));
        assert_eq!(report.scope, ReportScope::Beneficiary(AccountId::new("B")));
    }

    #[tokio::test]
    async fn test_status_override_reflected() {
        let store = MemoryStore::new();
        let dir = directory();
        let service = CommissionService::new(&store, &dir);

        let id = LedgerId::parse("com-P1-l1").unwrap();
        service.set_payment_status(&id, PaymentStatus::Paid).await.unwrap();

        let report = service.beneficiary_report(&AccountId::new("B")).await.unwrap();
        assert_eq!(report.ledger.entry(&id).unwrap().status, PaymentStatus::Paid);

        let balance = service.balance(&AccountId::new("B")).await.unwrap();
        assert_eq!(balance.paid, Decimal::new(11875, 2));
        assert_eq!(balance.pending, Decimal::new(1740, 2));

        service.reset_dashboard().await.unwrap();
        let report = service.beneficiary_report(&AccountId::new("B")).await.unwrap();
        assert_eq!(report.ledger.entry(&id).unwrap().status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_beneficiary() {
        let store = MemoryStore::new();
        let dir = directory();
        let service = CommissionService::new(&store, &dir);

        let err = service.beneficiary_report(&AccountId::new("nobody")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_transfer_persists() {
        let store = MemoryStore::new();
        let dir = directory();
        let service = CommissionService::new(&store, &dir);

        service
            .transfer(&AccountId::new("B"), &AccountId::new("P1"), Decimal::new(40, 0))
            .await
            .unwrap();

        let b = dir.get_account(&AccountId::new("B")).await.unwrap().unwrap();
        let p1 = dir.get_account(&AccountId::new("P1")).await.unwrap().unwrap();
        assert_eq!(b.balance, Decimal::new(60, 0));
        assert_eq!(p1.balance, Decimal::new(40, 0));

        let err = service
            .transfer(&AccountId::new("B"), &AccountId::new("P1"), Decimal::new(61, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(_)));
    }

    /// Rejects writes for one account id
    struct ReadOnlyAccount {
        inner: MemoryDirectory,
        locked: AccountId,
    }

    #[async_trait::async_trait]
    impl AccountDirectory for ReadOnlyAccount {
        async fn find_by_sponsor_handles(&self, handles: &[Handle]) -> StoreResult<Vec<Account>> {
            self.inner.find_by_sponsor_handles(handles).await
        }

        async fn get_account(&self, id: &AccountId) -> StoreResult<Option<Account>> {
            self.inner.get_account(id).await
        }

        async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
            self.inner.list_accounts().await
        }

        async fn get_package(&self, id: &PackageId) -> StoreResult<Option<Package>> {
            self.inner.get_package(id).await
        }

        async fn list_packages(&self) -> StoreResult<Vec<Package>> {
            self.inner.list_packages().await
        }

        async fn save_account(&self, account: &Account) -> StoreResult<()> {
            if account.account_id == self.locked {
                return Err(StoreError::permission_denied("save", account.account_id.as_str()));
            }
            self.inner.save_account(account).await
        }
    }

    #[tokio::test]
    async fn test_failed_recipient_write_restores_sender() {
        let store = MemoryStore::new();
        let dir = ReadOnlyAccount {
            inner: directory(),
            locked: AccountId::new("P1"),
        };
        let service = CommissionService::new(&store, &dir);

        let err = service
            .transfer(&AccountId::new("B"), &AccountId::new("P1"), Decimal::new(40, 0))
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());

        let b = dir.get_account(&AccountId::new("B")).await.unwrap().unwrap();
        let p1 = dir.get_account(&AccountId::new("P1")).await.unwrap().unwrap();
        assert_eq!(b.balance, Decimal::new(100, 0));
        assert_eq!(p1.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_balance_of_unknown_account() {
        let store = MemoryStore::new();
        let dir = directory();
        let service = CommissionService::new(&store, &dir);

        let err = service.balance(&AccountId::new("nobody")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let sheet = service.balance(&AccountId::new("B")).await.unwrap();
        assert_eq!(sheet.earned, Decimal::new(13615, 2));
        assert_eq!(sheet.wallet_balance, Decimal::new(100, 0));
    }
}
