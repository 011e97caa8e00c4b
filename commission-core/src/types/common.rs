//! Basic Types
//!
//! Naming conventions:
//! - `_id` suffix: Primary key identifiers
//! - `_handle` suffix: Human handles used for sponsorship lookups

use crate::error::{CommissionError, CommissionResult};
use serde::{Deserialize, Serialize};

// ============================================================
// ID Types
// ============================================================

/// Account ID
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Package ID
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId(pub String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sponsorship handle
///
/// Free-text username that sponsorship references point at. Uniqueness is
/// not enforced by the account store; duplicates fan out during downline
/// walks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub String);

impl Handle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================
// Roles
// ============================================================

/// Account role
///
/// Stored records use the platform's own terms (`impulsor_de_impacto`,
/// `client`); both spellings deserialize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[serde(alias = "impulsor_de_impacto")]
    Affiliate,
    #[serde(alias = "client")]
    Consumer,
}

impl Role {
    /// Commission table that applies when this role is on the receiving side
    pub fn commission_category(&self) -> CommissionCategory {
        match self {
            Role::Affiliate => CommissionCategory::Affiliate,
            Role::Consumer | Role::Admin => CommissionCategory::Consumer,
        }
    }

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Affiliate => "affiliate",
            Role::Consumer => "consumer",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = CommissionError;

    fn from_str(s: &str) -> CommissionResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "affiliate" | "impulsor_de_impacto" => Ok(Role::Affiliate),
            "consumer" | "client" => Ok(Role::Consumer),
            _ => Err(CommissionError::UnknownRole {
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Commission table category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionCategory {
    Affiliate,
    Consumer,
}

impl CommissionCategory {
    /// All categories
    pub const ALL: [CommissionCategory; 2] =
        [CommissionCategory::Affiliate, CommissionCategory::Consumer];

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            CommissionCategory::Affiliate => "affiliate",
            CommissionCategory::Consumer => "consumer",
        }
    }
}

impl std::str::FromStr for CommissionCategory {
    type Err = CommissionError;

    fn from_str(s: &str) -> CommissionResult<Self> {
        s.parse::<Role>().map(|role| role.commission_category())
    }
}

impl std::fmt::Display for CommissionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_source_terms_deserialize() {
        let role: Role = serde_json::from_str("\"impulsor_de_impacto\"").unwrap();
        assert_eq!(role, Role::Affiliate);

        let role: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, Role::Consumer);

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_category_lookup() {
        assert_eq!(Role::Affiliate.commission_category(), CommissionCategory::Affiliate);
        assert_eq!(Role::Consumer.commission_category(), CommissionCategory::Consumer);
        assert_eq!(Role::Admin.commission_category(), CommissionCategory::Consumer);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Affiliate".parse::<Role>().unwrap(), Role::Affiliate);
        assert_eq!("client".parse::<Role>().unwrap(), Role::Consumer);
        assert!("moderator".parse::<Role>().is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "impulsor_de_impacto".parse::<CommissionCategory>().unwrap(),
            CommissionCategory::Affiliate
        );
        assert_eq!(
            "consumer".parse::<CommissionCategory>().unwrap(),
            CommissionCategory::Consumer
        );
    }

    #[test]
    fn test_handle_empty() {
        assert!(Handle::new("  ").is_empty());
        assert!(!Handle::new("ana").is_empty());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(AccountId::new("acct:1").to_string(), "acct:1");
        assert_eq!(PackageId::new("pkg:gold").as_str(), "pkg:gold");
    }
}
