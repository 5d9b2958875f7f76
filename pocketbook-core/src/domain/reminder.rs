//! Payment reminder domain model

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};
use super::transaction::ensure_within_max;

/// An upcoming bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReminder {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub recurring: bool,
}

/// Editable fields of a payment reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub recurring: bool,
}

impl ReminderDraft {
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::validation("Reminder description is required"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::validation("Amount must be greater than zero"));
        }
        ensure_within_max(self.amount, "Amount")?;
        Ok(())
    }
}

impl PaymentReminder {
    pub fn from_draft(draft: ReminderDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: draft.description,
            amount: draft.amount,
            due_date: draft.due_date,
            recurring: draft.recurring,
        }
    }

    pub fn apply(&mut self, draft: ReminderDraft) {
        self.description = draft.description;
        self.amount = draft.amount;
        self.due_date = draft.due_date;
        self.recurring = draft.recurring;
    }

    /// Due strictly before `today`
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }

    /// Overdue relative to the local clock; never cached
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Local::now().date_naive())
    }
}
