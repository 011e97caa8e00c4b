//! Commission Level Settings
//!
//! One four-level table per [`CommissionCategory`]. Stored tables that are
//! missing or malformed fall back to the hard-coded defaults.

use super::common::{CommissionCategory, Role};
use super::event::{CommissionLevel, MAX_COMMISSION_LEVEL};
use crate::error::{CommissionError, CommissionResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Number of levels in every commission table
pub const LEVELS_PER_TABLE: usize = MAX_COMMISSION_LEVEL as usize;

fn default_active() -> bool {
    true
}

/// Setting for one level of a commission table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionLevelSetting {
    /// Percentage of the commission base (0-100)
    pub percentage: Decimal,
    /// Inactive levels pay nothing regardless of percentage
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
}

impl CommissionLevelSetting {
    /// Active level
    pub fn active(percentage: Decimal) -> Self {
        Self {
            percentage,
            active: true,
        }
    }

    /// Inactive level
    pub fn inactive(percentage: Decimal) -> Self {
        Self {
            percentage,
            active: false,
        }
    }

    /// Percentage that actually applies (zero when inactive)
    pub fn effective_percentage(&self) -> Decimal {
        if self.active {
            self.percentage
        } else {
            Decimal::ZERO
        }
    }

    fn validate(&self, level: usize) -> CommissionResult<()> {
        if self.percentage < Decimal::ZERO || self.percentage > Decimal::ONE_HUNDRED {
            return Err(CommissionError::PercentageOutOfRange {
                level,
                percentage: self.percentage,
            });
        }
        Ok(())
    }
}

/// Ordered four-level commission table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CommissionLevelSetting>", into = "Vec<CommissionLevelSetting>")]
pub struct CommissionTable {
    levels: [CommissionLevelSetting; LEVELS_PER_TABLE],
}

impl CommissionTable {
    /// Build from an ordered list; exactly four levels with 0-100 percentages
    pub fn from_levels(levels: Vec<CommissionLevelSetting>) -> CommissionResult<Self> {
        Self::from_levels_for(levels, "table")
    }

    fn from_levels_for(
        levels: Vec<CommissionLevelSetting>,
        category: &str,
    ) -> CommissionResult<Self> {
        let actual = levels.len();
        for (i, level) in levels.iter().enumerate() {
            level.validate(i + 1)?;
        }
        let levels: [CommissionLevelSetting; LEVELS_PER_TABLE] =
            levels
                .try_into()
                .map_err(|_| CommissionError::InvalidLevelCount {
                    category: category.to_string(),
                    expected: LEVELS_PER_TABLE,
                    actual,
                })?;
        Ok(Self { levels })
    }

    /// Default table for a category
    pub fn default_for(category: CommissionCategory) -> Self {
        match category {
            CommissionCategory::Affiliate => Self::default_affiliate(),
            CommissionCategory::Consumer => Self::default_consumer(),
        }
    }

    /// Affiliate defaults: 25/10/5/5, all active
    pub fn default_affiliate() -> Self {
        Self {
            levels: [
                CommissionLevelSetting::active(Decimal::new(25, 0)),
                CommissionLevelSetting::active(Decimal::new(10, 0)),
                CommissionLevelSetting::active(Decimal::new(5, 0)),
                CommissionLevelSetting::active(Decimal::new(5, 0)),
            ],
        }
    }

    /// Consumer defaults: 20/10/5/0, level 4 inactive
    pub fn default_consumer() -> Self {
        Self {
            levels: [
                CommissionLevelSetting::active(Decimal::new(20, 0)),
                CommissionLevelSetting::active(Decimal::new(10, 0)),
                CommissionLevelSetting::active(Decimal::new(5, 0)),
                CommissionLevelSetting::inactive(Decimal::ZERO),
            ],
        }
    }

    /// Parse a stored JSON value
    pub fn from_json_value(
        value: &serde_json::Value,
        category: CommissionCategory,
    ) -> CommissionResult<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| CommissionError::SettingsNotArray {
                category: category.name().to_string(),
            })?;
        let levels = items
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<Vec<CommissionLevelSetting>, _>>()?;
        Self::from_levels_for(levels, category.name())
    }

    /// Parse a stored JSON value, substituting the category default when
    /// the value is absent or malformed
    pub fn from_stored_or_default(
        value: Option<&serde_json::Value>,
        category: CommissionCategory,
    ) -> Self {
        let Some(value) = value else {
            return Self::default_for(category);
        };
        match Self::from_json_value(value, category) {
            Ok(table) => table,
            Err(e) => {
                warn!(
                    category = %category,
                    error = %e,
                    "Malformed commission table, using defaults"
                );
                Self::default_for(category)
            }
        }
    }

    /// Setting for a level
    pub fn level(&self, level: CommissionLevel) -> &CommissionLevelSetting {
        &self.levels[level.index()]
    }

    /// All levels in order
    pub fn levels(&self) -> &[CommissionLevelSetting] {
        &self.levels
    }
}

impl TryFrom<Vec<CommissionLevelSetting>> for CommissionTable {
    type Error = CommissionError;

    fn try_from(levels: Vec<CommissionLevelSetting>) -> CommissionResult<Self> {
        Self::from_levels(levels)
    }
}

impl From<CommissionTable> for Vec<CommissionLevelSetting> {
    fn from(table: CommissionTable) -> Self {
        table.levels.into()
    }
}

/// Commission tables for both categories
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionTables {
    pub affiliate: CommissionTable,
    pub consumer: CommissionTable,
}

impl CommissionTables {
    pub fn new(affiliate: CommissionTable, consumer: CommissionTable) -> Self {
        Self {
            affiliate,
            consumer,
        }
    }

    /// Table for a category
    pub fn for_category(&self, category: CommissionCategory) -> &CommissionTable {
        match category {
            CommissionCategory::Affiliate => &self.affiliate,
            CommissionCategory::Consumer => &self.consumer,
        }
    }

    /// Table applied when `role` is on the receiving side
    pub fn for_role(&self, role: Role) -> &CommissionTable {
        self.for_category(role.commission_category())
    }

    /// Replace the table for a category
    pub fn set(&mut self, category: CommissionCategory, table: CommissionTable) {
        match category {
            CommissionCategory::Affiliate => self.affiliate = table,
            CommissionCategory::Consumer => self.consumer = table,
        }
    }
}

impl Default for CommissionTables {
    fn default() -> Self {
        Self::new(
            CommissionTable::default_affiliate(),
            CommissionTable::default_consumer(),
        )
    }
}
