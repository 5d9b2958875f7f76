//! Transaction domain model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{Category, TransactionKind};
use super::result::{Error, Result};

/// Largest amount accepted for any money field (10^15)
///
/// Keeps ledger totals and percentages far from `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Reject `amount` above [`MAX_AMOUNT`]
pub(crate) fn ensure_within_max(amount: Decimal, field: &str) -> Result<()> {
    if amount > MAX_AMOUNT {
        return Err(Error::validation(format!("{} cannot exceed {}", field, MAX_AMOUNT)));
    }
    Ok(())
}

/// A single income or expense record in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    /// Always positive; the kind carries the sign
    pub amount: Decimal,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

/// The user-editable fields of a transaction
///
/// Used both to create a transaction and to replace the fields of an
/// existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            category,
            description: description.into(),
            date,
        }
    }

    /// Check the amount is in range and the category matches the kind
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::validation("Amount must be greater than zero"));
        }
        ensure_within_max(self.amount, "Amount")?;
        if !self.category.belongs_to(self.kind) {
            return Err(Error::validation(format!(
                "Category '{}' is not valid for {} transactions",
                self.category, self.kind
            )));
        }
        Ok(())
    }
}

impl Transaction {
    /// Create a transaction with a fresh id from validated fields
    pub fn from_draft(draft: TransactionDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
        }
    }

    /// Replace every editable field, keeping the id
    pub fn apply(&mut self, draft: TransactionDraft) {
        self.kind = draft.kind;
        self.amount = draft.amount;
        self.category = draft.category;
        self.description = draft.description;
        self.date = draft.date;
    }

    pub fn is_expense_in(&self, category: Category) -> bool {
        self.kind == TransactionKind::Expense && self.category == category
    }

    /// Amount with the kind's sign applied
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}
