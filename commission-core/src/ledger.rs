//! Payments Ledger
//!
//! One row per commission event, keyed by [`LedgerId`]. Status overrides
//! are persisted externally; everything else is recomputed.

use crate::error::{CommissionError, CommissionResult};
use crate::types::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Payment status of a ledger row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet paid
    #[default]
    Pending,
    /// Paid out
    Paid,
    /// Partially paid or blocked
    Incomplete,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Incomplete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Incomplete => "incomplete",
        }
    }

    /// Label shown in the payments ledger
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pendiente",
            PaymentStatus::Paid => "Pagado",
            PaymentStatus::Incomplete => "Incompleto",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = CommissionError;

    fn from_str(s: &str) -> CommissionResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(PaymentStatus::Pending),
            "paid" | "pagado" => Ok(PaymentStatus::Paid),
            "incomplete" | "incompleto" => Ok(PaymentStatus::Incomplete),
            _ => Err(CommissionError::InvalidPaymentStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One ledger row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub ledger_id: LedgerId,
    pub beneficiary_id: AccountId,
    pub source_account_id: AccountId,
    pub level: CommissionLevel,
    pub kind: CommissionKind,
    /// "Referido Personal" or "Bono de Equipo"
    pub category: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
}

impl LedgerEntry {
    fn from_event(event: &CommissionEvent, status: PaymentStatus) -> Self {
        Self {
            ledger_id: event.ledger_id(),
            beneficiary_id: event.beneficiary_id.clone(),
            source_account_id: event.source_account_id.clone(),
            level: event.level,
            kind: event.kind,
            category: event.kind.label().to_string(),
            amount: event.amount,
            status,
        }
    }
}

/// Payments ledger
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLedger {
    pub entries: Vec<LedgerEntry>,
}

impl PaymentLedger {
    /// Build from events, applying status overrides by ledger id.
    ///
    /// Rows without an override are [`PaymentStatus::Pending`].
    pub fn build(
        events: &[CommissionEvent],
        statuses: &HashMap<LedgerId, PaymentStatus>,
    ) -> Self {
        let entries = events
            .iter()
            .map(|event| {
                let status = statuses
                    .get(&event.ledger_id())
                    .copied()
                    .unwrap_or_default();
                LedgerEntry::from_event(event, status)
            })
            .collect();
        Self { entries }
    }

    /// Row by ledger id
    pub fn entry(&self, ledger_id: &LedgerId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| &e.ledger_id == ledger_id)
    }

    /// Rows owed to one beneficiary
    pub fn for_beneficiary<'a>(
        &'a self,
        beneficiary_id: &'a AccountId,
    ) -> impl Iterator<Item = &'a LedgerEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| &e.beneficiary_id == beneficiary_id)
    }

    /// Sum of amounts with the given status
    pub fn total_with_status(&self, status: PaymentStatus) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.status == status)
            .fold(Decimal::ZERO, |total, e| total.saturating_add(e.amount))
    }

    /// Totals for every status, in [`PaymentStatus::ALL`] order
    pub fn totals_by_status(&self) -> Vec<(PaymentStatus, Decimal)> {
        PaymentStatus::ALL
            .into_iter()
            .map(|status| (status, self.total_with_status(status)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<CommissionEvent> {
        vec![
            CommissionEvent::new(
                AccountId::new("B"),
                AccountId::new("P1"),
                CommissionLevel::new(1).unwrap(),
                Decimal::new(11875, 2),
            ),
            CommissionEvent::new(
                AccountId::new("B"),
                AccountId::new("P2"),
                CommissionLevel::new(2).unwrap(),
                Decimal::new(1740, 2),
            ),
            CommissionEvent::new(
                AccountId::new("C"),
                AccountId::new("P2"),
                CommissionLevel::new(1).unwrap(),
                Decimal::new(3980, 2),
            ),
        ]
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let ledger = PaymentLedger::build(&events(), &HashMap::new());
        assert_eq!(ledger.len(), 3);
        assert!(ledger.entries.iter().all(|e| e.status == PaymentStatus::Pending));
        assert_eq!(ledger.total_with_status(PaymentStatus::Pending), Decimal::new(17595, 2));
    }

    #[test]
    fn test_overrides_applied_by_ledger_id() {
        let mut statuses = HashMap::new();
        statuses.insert(LedgerId::parse("com-P1-l1").unwrap(), PaymentStatus::Paid);
        statuses.insert(LedgerId::parse("com-ghost-l1").unwrap(), PaymentStatus::Paid);

        let ledger = PaymentLedger::build(&events(), &statuses);
        let row = ledger.entry(&LedgerId::parse("com-P1-l1").unwrap()).unwrap();
        assert_eq!(row.status, PaymentStatus::Paid);
        assert_eq!(row.category, "Referido Personal");

        let totals = ledger.totals_by_status();
        assert_eq!(totals[0], (PaymentStatus::Pending, Decimal::new(5720, 2)));
        assert_eq!(totals[1], (PaymentStatus::Paid, Decimal::new(11875, 2)));
        assert_eq!(totals[2], (PaymentStatus::Incomplete, Decimal::ZERO));
    }

    #[test]
    fn test_for_beneficiary() {
        let ledger = PaymentLedger::build(&events(), &HashMap::new());
        let b = AccountId::new("B");
        let ids: Vec<&str> = ledger.for_beneficiary(&b).map(|e| e.ledger_id.as_str()).collect();
        assert_eq!(ids, vec!["com-P1-l1", "com-P2-l2"]);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Pagado".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!("incomplete".parse::<PaymentStatus>().unwrap(), PaymentStatus::Incomplete);
        assert!(matches!(
            "refunded".parse::<PaymentStatus>(),
            Err(CommissionError::InvalidPaymentStatus { .. })
        ));
        assert_eq!(serde_json::to_string(&PaymentStatus::Paid).unwrap(), "\"paid\"");
    }
}
