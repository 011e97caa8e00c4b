//! Account and Package records
//!
//! Both are owned by external stores and read-only to the aggregator.

use super::common::{AccountId, Handle, PackageId, Role};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Platform account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID
    #[serde(alias = "id")]
    pub account_id: AccountId,
    /// Role
    pub role: Role,
    /// Handle other accounts use as their sponsor reference
    #[serde(alias = "username")]
    pub handle: Handle,
    /// Handle of the sponsoring account
    #[serde(default)]
    pub sponsor_handle: Option<Handle>,
    /// Selected activation package
    #[serde(default)]
    pub selected_package_id: Option<PackageId>,
    /// Amount subtracted from the package's activation fee
    #[serde(default)]
    pub discount_applied: Decimal,
    /// Wallet balance, mutated by transfers
    #[serde(default)]
    pub balance: Decimal,
}

impl Account {
    /// Create new account with no sponsor or package
    pub fn new(account_id: AccountId, role: Role, handle: Handle) -> Self {
        Self {
            account_id,
            role,
            handle,
            sponsor_handle: None,
            selected_package_id: None,
            discount_applied: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Set sponsor handle
    pub fn with_sponsor(mut self, sponsor: Handle) -> Self {
        self.sponsor_handle = Some(sponsor);
        self
    }

    /// Set selected package
    pub fn with_package(mut self, package_id: PackageId) -> Self {
        self.selected_package_id = Some(package_id);
        self
    }

    /// Set discount
    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount_applied = discount;
        self
    }

    /// Set balance
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    /// Discount used as the commission base reduction.
    ///
    /// Negative stored discounts are treated as zero.
    pub fn effective_discount(&self) -> Decimal {
        self.discount_applied.max(Decimal::ZERO)
    }

    /// Sponsor handle, ignoring blank values
    pub fn sponsor(&self) -> Option<&Handle> {
        self.sponsor_handle.as_ref().filter(|h| !h.is_empty())
    }
}

/// Activation package
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package ID
    #[serde(alias = "id")]
    pub package_id: PackageId,
    /// One-time activation fee, the commission base
    pub activation_fee: Decimal,
    /// Role category that purchases this package
    pub target_role: Role,
}

impl Package {
    pub fn new(package_id: PackageId, activation_fee: Decimal, target_role: Role) -> Self {
        Self {
            package_id,
            activation_fee,
            target_role,
        }
    }

    /// Whether the fee can generate commissions
    pub fn is_billable(&self) -> bool {
        self.activation_fee > Decimal::ZERO
    }
}
