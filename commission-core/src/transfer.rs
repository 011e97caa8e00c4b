//! Transfers Balance
//!
//! Commission balance of one account and validation of wallet transfers
//! between accounts. Nothing here mutates its inputs until
//! [`TransferPlan::apply`] is called.

use crate::error::{CommissionError, CommissionResult};
use crate::ledger::{PaymentLedger, PaymentStatus};
use crate::types::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Commission and wallet balance for one account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub account_id: AccountId,
    /// Sum of all commission events owed to the account
    pub earned: Decimal,
    /// Ledger rows marked paid
    pub paid: Decimal,
    /// Ledger rows still pending
    pub pending: Decimal,
    /// Ledger rows marked incomplete
    pub incomplete: Decimal,
    /// Stored wallet balance
    pub wallet_balance: Decimal,
}

impl BalanceSheet {
    /// Balance of `account` given the events and ledger of one computation
    pub fn for_account(
        account: &Account,
        events: &[CommissionEvent],
        ledger: &PaymentLedger,
    ) -> Self {
        let earned = events
            .iter()
            .filter(|e| e.beneficiary_id == account.account_id)
            .fold(Decimal::ZERO, |total, e| total.saturating_add(e.amount));

        let mut sheet = Self {
            account_id: account.account_id.clone(),
            earned,
            paid: Decimal::ZERO,
            pending: Decimal::ZERO,
            incomplete: Decimal::ZERO,
            wallet_balance: account.balance,
        };
        for entry in ledger.for_beneficiary(&account.account_id) {
            let bucket = match entry.status {
                PaymentStatus::Paid => &mut sheet.paid,
                PaymentStatus::Pending => &mut sheet.pending,
                PaymentStatus::Incomplete => &mut sheet.incomplete,
            };
            *bucket = bucket.saturating_add(entry.amount);
        }
        sheet
    }

    /// Earned commission not yet paid out
    pub fn outstanding(&self) -> Decimal {
        self.pending.saturating_add(self.incomplete)
    }
}

/// Validated transfer with the resulting balances
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPlan {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Decimal,
    pub from_balance_after: Decimal,
    pub to_balance_after: Decimal,
}

impl TransferPlan {
    /// Write the planned balances into the accounts
    pub fn apply(&self, from: &mut Account, to: &mut Account) -> CommissionResult<()> {
        if from.account_id != self.from_account_id {
            return Err(CommissionError::not_found("Account", from.account_id.as_str()));
        }
        if to.account_id != self.to_account_id {
            return Err(CommissionError::not_found("Account", to.account_id.as_str()));
        }
        from.balance = self.from_balance_after;
        to.balance = self.to_balance_after;
        Ok(())
    }
}

/// Validate a wallet transfer of `amount` from `from` to `to`
pub fn plan_transfer(
    from: &Account,
    to: &Account,
    amount: Decimal,
) -> CommissionResult<TransferPlan> {
    if amount <= Decimal::ZERO {
        return Err(CommissionError::InvalidAmount {
            reason: format!("{} is not positive", amount),
        });
    }
    if from.account_id == to.account_id {
        return Err(CommissionError::SelfTransfer {
            account_id: from.account_id.to_string(),
        });
    }
    if from.balance < amount {
        return Err(CommissionError::InsufficientBalance {
            account_id: from.account_id.to_string(),
            required: amount,
            available: from.balance,
        });
    }

    let out_of_range = || CommissionError::InvalidAmount {
        reason: format!("{} overflows the recipient balance", amount),
    };
    let from_balance_after = from.balance.checked_sub(amount).ok_or_else(out_of_range)?;
    let to_balance_after = to.balance.checked_add(amount).ok_or_else(out_of_range)?;

    Ok(TransferPlan {
        from_account_id: from.account_id.clone(),
        to_account_id: to.account_id.clone(),
        amount,
        from_balance_after,
        to_balance_after,
    })
}
