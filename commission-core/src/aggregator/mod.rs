//! Referral Commission Aggregator
//!
//! Computes the commission events a beneficiary is owed by its downline:
//! - Downline walk (up to four sponsorship levels, cycle-safe)
//! - Upline walk for the global view (per-hop sponsor role)
//! - Per-level, per-role commission tables
//! - Personal referral / team bonus classification
//!
//! Everything here is pure and synchronous. Accounts, packages and tables
//! are fetched by the caller and passed in; unresolvable references are
//! skipped rather than reported.

mod downline;
mod engine;

pub use downline::*;
pub use engine::*;

use crate::types::*;
use std::collections::HashMap;

/// Accounts indexed by sponsor handle, own handle and id
#[derive(Clone, Debug, Default)]
pub struct SponsorIndex {
    accounts: Vec<Account>,
    by_id: HashMap<AccountId, usize>,
    by_handle: HashMap<Handle, Vec<usize>>,
    by_sponsor: HashMap<Handle, Vec<usize>>,
}

impl SponsorIndex {
    /// Build an index over the given accounts
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        let mut index = Self::default();
        for account in accounts {
            index.insert(account);
        }
        index
    }

    /// Add an account; a repeated id replaces the id lookup but keeps both
    /// records reachable by handle
    pub fn insert(&mut self, account: Account) {
        let pos = self.accounts.len();
        if let Some(sponsor) = account.sponsor() {
            self.by_sponsor.entry(sponsor.clone()).or_default().push(pos);
        }
        self.by_handle
            .entry(account.handle.clone())
            .or_default()
            .push(pos);
        self.by_id.insert(account.account_id.clone(), pos);
        self.accounts.push(account);
    }

    /// Accounts whose sponsor handle equals `handle`
    pub fn sponsored_by(&self, handle: &Handle) -> impl Iterator<Item = &Account> + '_ {
        self.by_sponsor
            .get(handle)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.accounts[pos])
    }

    /// First account carrying `handle`, in insertion order
    pub fn find_by_handle(&self, handle: &Handle) -> Option<&Account> {
        self.by_handle
            .get(handle)
            .and_then(|positions| positions.first())
            .map(|&pos| &self.accounts[pos])
    }

    /// Account by id
    pub fn get(&self, account_id: &AccountId) -> Option<&Account> {
        self.by_id.get(account_id).map(|&pos| &self.accounts[pos])
    }

    /// Sponsor of `account`, if it resolves
    pub fn sponsor_of(&self, account: &Account) -> Option<&Account> {
        account.sponsor().and_then(|h| self.find_by_handle(h))
    }

    /// All indexed accounts in insertion order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Packages by id
#[derive(Clone, Debug, Default)]
pub struct PackageCatalog {
    packages: HashMap<PackageId, Package>,
}

impl PackageCatalog {
    pub fn new(packages: impl IntoIterator<Item = Package>) -> Self {
        Self {
            packages: packages
                .into_iter()
                .map(|p| (p.package_id.clone(), p))
                .collect(),
        }
    }

    pub fn insert(&mut self, package: Package) {
        self.packages.insert(package.package_id.clone(), package);
    }

    pub fn get(&self, package_id: &PackageId) -> Option<&Package> {
        self.packages.get(package_id)
    }

    /// Package selected by `account`, if it exists and has a positive fee
    pub fn billable_for(&self, account: &Account) -> Option<&Package> {
        account
            .selected_package_id
            .as_ref()
            .and_then(|id| self.get(id))
            .filter(|p| p.is_billable())
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn account(id: &str, handle: &str, sponsor: Option<&str>) -> Account {
        let a = Account::new(AccountId::new(id), Role::Consumer, Handle::new(handle));
        match sponsor {
            Some(s) => a.with_sponsor(Handle::new(s)),
            None => a,
        }
    }

    #[test]
    fn test_sponsored_by() {
        let index = SponsorIndex::new(vec![
            account("1", "root", None),
            account("2", "ana", Some("root")),
            account("3", "bea", Some("root")),
            account("4", "caro", Some("ana")),
        ]);

        let ids: Vec<&str> = index
            .sponsored_by(&Handle::new("root"))
            .map(|a| a.account_id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert_eq!(index.sponsored_by(&Handle::new("nobody")).count(), 0);
    }

    #[test]
    fn test_find_by_handle_first_wins() {
        let index = SponsorIndex::new(vec![account("1", "dup", None), account("2", "dup", None)]);
        assert_eq!(
            index.find_by_handle(&Handle::new("dup")).map(|a| a.account_id.as_str()),
            Some("1")
        );
    }

    #[test]
    fn test_sponsor_of() {
        let index = SponsorIndex::new(vec![account("1", "root", None), account("2", "ana", Some("root"))]);
        let child = index.get(&AccountId::new("2")).unwrap();
        assert_eq!(index.sponsor_of(child).unwrap().account_id, AccountId::new("1"));
        let root = index.get(&AccountId::new("1")).unwrap();
        assert!(index.sponsor_of(root).is_none());
    }

    #[test]
    fn test_billable_for() {
        let catalog = PackageCatalog::new(vec![
            Package::new(PackageId::new("gold"), Decimal::new(475, 0), Role::Affiliate),
            Package::new(PackageId::new("free"), Decimal::ZERO, Role::Consumer),
        ]);

        let gold = account("1", "a", None).with_package(PackageId::new("gold"));
        let free = account("2", "b", None).with_package(PackageId::new("free"));
        let missing = account("3", "c", None).with_package(PackageId::new("gone"));
        let none = account("4", "d", None);

        assert!(catalog.billable_for(&gold).is_some());
        assert!(catalog.billable_for(&free).is_none());
        assert!(catalog.billable_for(&missing).is_none());
        assert!(catalog.billable_for(&none).is_none());
    }
}
