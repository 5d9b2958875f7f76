//! Budget domain model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Utilization above this percentage is a warning
pub const WARNING_THRESHOLD_PERCENT: i64 = 70;

/// Utilization above this percentage is critical
pub const CRITICAL_THRESHOLD_PERCENT: i64 = 90;

/// A spending limit for one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Category,
    pub limit: Decimal,
    /// Derived from the ledger; overwritten on every ledger change
    pub spent: Decimal,
}

/// Warning tier of a budget's utilization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationLevel {
    Healthy,
    Warning,
    Critical,
}

impl Budget {
    pub fn new(category: Category, limit: Decimal, spent: Decimal) -> Self {
        Self {
            category,
            limit,
            spent,
        }
    }

    /// spent / limit × 100, uncapped. `None` for a zero limit or when the
    /// figure is out of range.
    pub fn utilization_percent(&self) -> Option<Decimal> {
        self.spent
            .checked_div(self.limit)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }

    /// Utilization clamped to 0..=100 for progress bars
    ///
    /// The percentage figure itself stays uncapped; only the bar is clamped.
    pub fn bar_percent(&self) -> Decimal {
        match self.utilization_percent() {
            Some(p) => p.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
            None if self.spent > Decimal::ZERO => Decimal::ONE_HUNDRED,
            None => Decimal::ZERO,
        }
    }

    pub fn level(&self) -> UtilizationLevel {
        let percent = match self.utilization_percent() {
            Some(p) => p,
            None if self.spent > Decimal::ZERO => return UtilizationLevel::Critical,
            None => return UtilizationLevel::Healthy,
        };
        if percent > Decimal::from(CRITICAL_THRESHOLD_PERCENT) {
            UtilizationLevel::Critical
        } else if percent > Decimal::from(WARNING_THRESHOLD_PERCENT) {
            UtilizationLevel::Warning
        } else {
            UtilizationLevel::Healthy
        }
    }

    /// limit − spent; negative when over budget
    pub fn remaining(&self) -> Decimal {
        self.limit.saturating_sub(self.spent)
    }
}
