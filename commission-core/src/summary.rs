//! Dashboard Summary
//!
//! Totals shown on the commissions dashboard, derived from a set of
//! commission events.

use crate::types::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Total owed to one beneficiary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryTotal {
    pub beneficiary_id: AccountId,
    pub total: Decimal,
    pub event_count: usize,
}

/// Total for one level
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTotal {
    pub level: CommissionLevel,
    pub total: Decimal,
    pub event_count: usize,
}

/// Dashboard summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSummary {
    /// Sum of every event amount
    pub total_revenue: Decimal,
    /// Level 1 total
    pub personal_referral_total: Decimal,
    /// Level 1 event count
    pub personal_referral_count: usize,
    /// Levels 2-4 total
    pub team_bonus_total: Decimal,
    /// Levels 2-4 event count
    pub team_bonus_count: usize,
    /// One entry per level, levels without events included
    pub level_totals: Vec<LevelTotal>,
    /// Beneficiaries by total, largest first
    pub by_beneficiary: Vec<BeneficiaryTotal>,
}

impl CommissionSummary {
    /// Summarize a set of events.
    ///
    /// Totals saturate at `Decimal::MAX` rather than overflow.
    pub fn from_events(events: &[CommissionEvent]) -> Self {
        let mut summary = Self::empty();
        let mut beneficiaries: BTreeMap<&AccountId, (Decimal, usize)> = BTreeMap::new();

        for event in events {
            summary.total_revenue = summary.total_revenue.saturating_add(event.amount);
            match event.kind {
                CommissionKind::PersonalReferral => {
                    summary.personal_referral_total =
                        summary.personal_referral_total.saturating_add(event.amount);
                    summary.personal_referral_count += 1;
                }
                CommissionKind::TeamBonus => {
                    summary.team_bonus_total = summary.team_bonus_total.saturating_add(event.amount);
                    summary.team_bonus_count += 1;
                }
            }

            let level = &mut summary.level_totals[event.level.index()];
            level.total = level.total.saturating_add(event.amount);
            level.event_count += 1;

            let entry = beneficiaries
                .entry(&event.beneficiary_id)
                .or_insert((Decimal::ZERO, 0));
            entry.0 = entry.0.saturating_add(event.amount);
            entry.1 += 1;
        }

        summary.by_beneficiary = beneficiaries
            .into_iter()
            .map(|(id, (total, event_count))| BeneficiaryTotal {
                beneficiary_id: id.clone(),
                total,
                event_count,
            })
            .collect();
        // Stable sort keeps id order among equal totals
        summary.by_beneficiary.sort_by(|a, b| b.total.cmp(&a.total));

        summary
    }

    /// Summary with no events
    pub fn empty() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            personal_referral_total: Decimal::ZERO,
            personal_referral_count: 0,
            team_bonus_total: Decimal::ZERO,
            team_bonus_count: 0,
            level_totals: CommissionLevel::ALL
                .into_iter()
                .map(|level| LevelTotal {
                    level,
                    total: Decimal::ZERO,
                    event_count: 0,
                })
                .collect(),
            by_beneficiary: Vec::new(),
        }
    }

    /// Number of events summarized
    pub fn event_count(&self) -> usize {
        self.personal_referral_count + self.team_bonus_count
    }

    /// Total for one beneficiary
    pub fn total_for(&self, beneficiary_id: &AccountId) -> Decimal {
        self.by_beneficiary
            .iter()
            .find(|b| &b.beneficiary_id == beneficiary_id)
            .map(|b| b.total)
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for CommissionSummary {
    fn default() -> Self {
        Self::empty()
    }
}
