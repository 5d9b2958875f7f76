//! Savings goal domain model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};
use super::transaction::ensure_within_max;

/// Money being put aside towards a target by a deadline
///
/// No invariant ties `current_amount` to `target_amount`; overshooting is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
}

/// Editable fields of a savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
}

impl GoalDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Goal name is required"));
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(Error::validation("Target amount must be greater than zero"));
        }
        if self.current_amount < Decimal::ZERO {
            return Err(Error::validation("Current amount cannot be negative"));
        }
        ensure_within_max(self.target_amount, "Target amount")?;
        ensure_within_max(self.current_amount, "Current amount")?;
        Ok(())
    }
}

impl SavingsGoal {
    pub fn from_draft(draft: GoalDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            target_amount: draft.target_amount,
            current_amount: draft.current_amount,
            deadline: draft.deadline,
        }
    }

    pub fn apply(&mut self, draft: GoalDraft) {
        self.name = draft.name;
        self.target_amount = draft.target_amount;
        self.current_amount = draft.current_amount;
        self.deadline = draft.deadline;
    }

    /// current / target × 100, uncapped. `None` for a zero target or when
    /// the figure is out of range.
    pub fn progress_percent(&self) -> Option<Decimal> {
        self.current_amount
            .checked_div(self.target_amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }

    /// Progress clamped to 100 for display
    pub fn display_percent(&self) -> Decimal {
        self.progress_percent()
            .unwrap_or(Decimal::ZERO)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    /// Amount still missing; negative once the goal is exceeded
    pub fn remaining(&self) -> Decimal {
        self.target_amount.saturating_sub(self.current_amount)
    }
}
