//! Derived aggregates over the ledger
//!
//! Everything here is recomputed from the transactions on demand; none of
//! these values is ever stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::{Category, TransactionKind};
use super::transaction::Transaction;

/// Sum that clamps at `Decimal::MAX` instead of overflowing
///
/// Validation bounds each amount, but a hand-edited store is not validated.
pub(crate) fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of amounts of the given kind
pub fn total_for_kind(transactions: &[Transaction], kind: TransactionKind) -> Decimal {
    saturating_sum(transactions.iter().filter(|t| t.kind == kind).map(|t| t.amount))
}

pub fn total_income(transactions: &[Transaction]) -> Decimal {
    total_for_kind(transactions, TransactionKind::Income)
}

pub fn total_expense(transactions: &[Transaction]) -> Decimal {
    total_for_kind(transactions, TransactionKind::Expense)
}

/// total income − total expense
pub fn balance(transactions: &[Transaction]) -> Decimal {
    total_income(transactions).saturating_sub(total_expense(transactions))
}

/// Sum of expense amounts in one category
pub fn category_spent(transactions: &[Transaction], category: Category) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.is_expense_in(category))
            .map(|t| t.amount),
    )
}

/// Total of one category for one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub label: String,
    pub total: Decimal,
}

/// Per-category sums for `kind`, in the kind's category order
///
/// Categories that sum to zero are left out.
pub fn by_category(transactions: &[Transaction], kind: TransactionKind) -> Vec<CategoryTotal> {
    kind.categories()
        .iter()
        .map(|&category| CategoryTotal {
            category,
            label: category.label().to_string(),
            total: saturating_sum(
                transactions
                    .iter()
                    .filter(|t| t.kind == kind && t.category == category)
                    .map(|t| t.amount),
            ),
        })
        .filter(|c| c.total > Decimal::ZERO)
        .collect()
}

/// Headline figures for the dashboard and report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub transaction_count: usize,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    /// balance / income × 100, zero when there is no income
    pub savings_rate: Decimal,
}

impl LedgerSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_income = total_income(transactions);
        let total_expense = total_expense(transactions);
        let balance = total_income.saturating_sub(total_expense);
        let savings_rate = if total_income > Decimal::ZERO {
            balance
                .checked_div(total_income)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        Self {
            transaction_count: transactions.len(),
            total_income,
            total_expense,
            balance,
            savings_rate,
        }
    }
}
