//! Commission Events
//!
//! Output of the aggregator. Events are recomputed from scratch on every
//! refresh; only payment status is persisted, keyed by [`LedgerId`].

use super::common::AccountId;
use crate::error::{CommissionError, CommissionResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Deepest sponsorship level that earns commission
pub const MAX_COMMISSION_LEVEL: u8 = 4;

/// Sponsorship depth from beneficiary to purchaser (1-4)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CommissionLevel(u8);

impl CommissionLevel {
    /// Direct referral
    pub const FIRST: CommissionLevel = CommissionLevel(1);

    /// All levels in order
    pub const ALL: [CommissionLevel; 4] = [
        CommissionLevel(1),
        CommissionLevel(2),
        CommissionLevel(3),
        CommissionLevel(4),
    ];

    /// Create a level, rejecting values outside 1-4
    pub fn new(level: u8) -> CommissionResult<Self> {
        if (1..=MAX_COMMISSION_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(CommissionError::InvalidLevel { level })
        }
    }

    /// 1-based level number
    pub fn get(&self) -> u8 {
        self.0
    }

    /// 0-based index into a commission table
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    /// Next deeper level, if any
    pub fn next(&self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    /// Commission kind for this level
    pub fn kind(&self) -> CommissionKind {
        CommissionKind::for_level(*self)
    }
}

impl TryFrom<u8> for CommissionLevel {
    type Error = CommissionError;

    fn try_from(value: u8) -> CommissionResult<Self> {
        Self::new(value)
    }
}

impl From<CommissionLevel> for u8 {
    fn from(level: CommissionLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for CommissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commission kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommissionKind {
    /// Level 1
    PersonalReferral,
    /// Levels 2-4
    TeamBonus,
}

impl CommissionKind {
    pub fn for_level(level: CommissionLevel) -> Self {
        if level == CommissionLevel::FIRST {
            CommissionKind::PersonalReferral
        } else {
            CommissionKind::TeamBonus
        }
    }

    /// Label shown in the payments ledger
    pub fn label(&self) -> &'static str {
        match self {
            CommissionKind::PersonalReferral => "Referido Personal",
            CommissionKind::TeamBonus => "Bono de Equipo",
        }
    }
}

impl std::fmt::Display for CommissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One commission owed to a beneficiary for one purchaser at one level
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommissionEvent {
    /// Account receiving the commission
    pub beneficiary_id: AccountId,
    /// Account whose purchase generated it
    pub source_account_id: AccountId,
    /// Sponsorship depth
    pub level: CommissionLevel,
    /// Personal referral or team bonus
    pub kind: CommissionKind,
    /// Commission amount, always positive
    pub amount: Decimal,
}

impl CommissionEvent {
    /// Create an event; kind is derived from the level
    pub fn new(
        beneficiary_id: AccountId,
        source_account_id: AccountId,
        level: CommissionLevel,
        amount: Decimal,
    ) -> Self {
        Self {
            beneficiary_id,
            source_account_id,
            level,
            kind: level.kind(),
            amount,
        }
    }

    /// Ledger id used to key persisted payment status
    pub fn ledger_id(&self) -> LedgerId {
        LedgerId::new(&self.source_account_id, self.level)
    }
}

/// Payments ledger id: `com-{purchaserId}-l{level}`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerId(pub String);

impl LedgerId {
    pub const PREFIX: &'static str = "com-";

    pub fn new(source_account_id: &AccountId, level: CommissionLevel) -> Self {
        Self(format!("{}{}-l{}", Self::PREFIX, source_account_id, level))
    }

    /// Parse and validate a ledger id
    pub fn parse(id: &str) -> CommissionResult<Self> {
        Self::split(id).map(|_| Self(id.to_string()))
    }

    /// Purchaser and level encoded in the id
    pub fn parts(&self) -> CommissionResult<(AccountId, CommissionLevel)> {
        Self::split(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(id: &str) -> CommissionResult<(AccountId, CommissionLevel)> {
        let invalid = || CommissionError::InvalidLedgerId { id: id.to_string() };

        let rest = id.strip_prefix(Self::PREFIX).ok_or_else(invalid)?;
        let (source, level) = rest.rsplit_once("-l").ok_or_else(invalid)?;
        if source.is_empty() {
            return Err(invalid());
        }
        let level: u8 = level.parse().map_err(|_| invalid())?;
        let level = CommissionLevel::new(level).map_err(|_| invalid())?;

        Ok((AccountId::new(source), level))
    }
}

impl std::fmt::Display for LedgerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bounds() {
        assert!(CommissionLevel::new(0).is_err());
        assert!(CommissionLevel::new(5).is_err());
        assert_eq!(CommissionLevel::new(4).unwrap().index(), 3);
        assert_eq!(CommissionLevel::new(4).unwrap().next(), None);
    }

    #[test]
    fn test_level_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<CommissionLevel>("5").is_err());
        assert_eq!(
            serde_json::from_str::<CommissionLevel>("2").unwrap(),
            CommissionLevel::new(2).unwrap()
        );
    }

    #[test]
    fn test_kind_classification() {
        for level in CommissionLevel::ALL {
            let expected = if level.get() == 1 {
                CommissionKind::PersonalReferral
            } else {
                CommissionKind::TeamBonus
            };
            assert_eq!(level.kind(), expected);
        }
        assert_eq!(CommissionKind::PersonalReferral.label(), "Referido Personal");
        assert_eq!(CommissionKind::TeamBonus.label(), "Bono de Equipo");
    }

    #[test]
    fn test_ledger_id_format() {
        let event = CommissionEvent::new(
            AccountId::new("b"),
            AccountId::new("p-1"),
            CommissionLevel::new(2).unwrap(),
            Decimal::new(174, 1),
        );
        assert_eq!(event.ledger_id().as_str(), "com-p-1-l2");
        assert_eq!(event.kind, CommissionKind::TeamBonus);
    }

    #[test]
    fn test_ledger_id_parse() {
        let id = LedgerId::parse("com-user-l-9-l3").unwrap();
        let (source, level) = id.parts().unwrap();
        assert_eq!(source, AccountId::new("user-l-9"));
        assert_eq!(level.get(), 3);

        assert!(LedgerId::parse("com--l1").is_err());
        assert!(LedgerId::parse("com-abc-l7").is_err());
        assert!(LedgerId::parse("pay-abc-l1").is_err());
        assert!(LedgerId::parse("com-abc").is_err());
    }
}
