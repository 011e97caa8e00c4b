//! Aggregator Engine
//!
//! Core commission calculation logic.

use super::{upline_chain, DownlineLevels, PackageCatalog, SponsorIndex};
use crate::types::*;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Commission for one purchase at one level.
///
/// `(activation_fee - discount) * percentage / 100`, or `None` when the
/// level is inactive, the fee is not positive, or the result is not
/// positive. Amounts too large for a `Decimal` are skipped as well.
pub fn commission_amount(
    package: &Package,
    discount: Decimal,
    setting: &CommissionLevelSetting,
) -> Option<Decimal> {
    if !setting.active || !package.is_billable() {
        return None;
    }
    let amount = package
        .activation_fee
        .checked_sub(discount)
        .and_then(|base| base.checked_mul(setting.percentage))
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED));
    let Some(amount) = amount else {
        warn!(
            package_id = %package.package_id,
            activation_fee = %package.activation_fee,
            percentage = %setting.percentage,
            "Commission amount out of range, skipping"
        );
        return None;
    };
    (amount > Decimal::ZERO).then_some(amount)
}

/// Commission aggregator over one package catalog and table set
pub struct CommissionAggregator<'a> {
    packages: &'a PackageCatalog,
    tables: &'a CommissionTables,
}

impl<'a> CommissionAggregator<'a> {
    /// Create new aggregator
    pub fn new(packages: &'a PackageCatalog, tables: &'a CommissionTables) -> Self {
        Self { packages, tables }
    }

    /// Single-beneficiary view.
    ///
    /// The beneficiary's own role selects the table for all four levels.
    pub fn for_beneficiary(&self, beneficiary: &Account, index: &SponsorIndex) -> Vec<CommissionEvent> {
        let downline = DownlineLevels::walk(beneficiary, index);
        self.for_downline(beneficiary, &downline)
    }

    /// Single-beneficiary view over a downline fetched by the caller
    pub fn for_downline(
        &self,
        beneficiary: &Account,
        downline: &DownlineLevels,
    ) -> Vec<CommissionEvent> {
        let table = self.tables.for_role(beneficiary.role);
        let mut events = Vec::new();

        for (level, purchasers) in downline.iter() {
            let setting = table.level(level);
            if !setting.active {
                continue;
            }
            for purchaser in purchasers {
                if let Some(amount) = self.purchase_commission(purchaser, setting) {
                    events.push(CommissionEvent::new(
                        beneficiary.account_id.clone(),
                        purchaser.account_id.clone(),
                        level,
                        amount,
                    ));
                }
            }
        }

        sort_events(&mut events);
        debug!(
            beneficiary = %beneficiary.account_id,
            role = %beneficiary.role,
            purchasers = downline.account_count(),
            count = events.len(),
            "Computed beneficiary commissions"
        );
        events
    }

    /// Global (admin) view.
    ///
    /// Walks up from every purchaser; the sponsor's own role at each hop
    /// selects the table for that hop.
    pub fn for_all(&self, index: &SponsorIndex) -> Vec<CommissionEvent> {
        let mut events = Vec::new();

        for purchaser in index.accounts() {
            let Some(package) = self.packages.billable_for(purchaser) else {
                continue;
            };
            let discount = purchaser.effective_discount();

            for (level, sponsor) in upline_chain(purchaser, index) {
                let setting = self.tables.for_role(sponsor.role).level(level);
                if let Some(amount) = commission_amount(package, discount, setting) {
                    events.push(CommissionEvent::new(
                        sponsor.account_id.clone(),
                        purchaser.account_id.clone(),
                        level,
                        amount,
                    ));
                }
            }
        }

        sort_events(&mut events);
        debug!(
            accounts = index.len(),
            count = events.len(),
            "Computed global commissions"
        );
        events
    }

    fn purchase_commission(
        &self,
        purchaser: &Account,
        setting: &CommissionLevelSetting,
    ) -> Option<Decimal> {
        let package = self.packages.billable_for(purchaser)?;
        commission_amount(package, purchaser.effective_discount(), setting)
    }
}

/// Every commission `beneficiary` is owed by its downline
pub fn compute_commissions(
    beneficiary: &Account,
    index: &SponsorIndex,
    packages: &PackageCatalog,
    tables: &CommissionTables,
) -> Vec<CommissionEvent> {
    CommissionAggregator::new(packages, tables).for_beneficiary(beneficiary, index)
}

/// Every commission owed to any account in `index`
pub fn compute_all_commissions(
    index: &SponsorIndex,
    packages: &PackageCatalog,
    tables: &CommissionTables,
) -> Vec<CommissionEvent> {
    CommissionAggregator::new(packages, tables).for_all(index)
}

/// Stable order: beneficiary, level, source
fn sort_events(events: &mut [CommissionEvent]) {
    events.sort_by(|a, b| {
        a.beneficiary_id
            .cmp(&b.beneficiary_id)
            .then(a.level.cmp(&b.level))
            .then(a.source_account_id.cmp(&b.source_account_id))
    });
}
