//! Spend-trend suggestions
//!
//! A fixed rule list, not a statistical model: each rule fires when one
//! expense category's total exceeds its threshold.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::summary::category_spent;
use super::transaction::Transaction;

/// One threshold rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRule {
    pub category: Category,
    /// Rule fires when spend is strictly above this
    pub threshold: Decimal,
    /// Fraction of the spend reported as potential savings (0.2 = 20%)
    pub savings_rate: Decimal,
    pub message: String,
}

/// Advisory message produced by a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSuggestion {
    pub category: Category,
    pub label: String,
    pub message: String,
    pub spent: Decimal,
    pub estimated_savings: Decimal,
}

/// Built-in rules: food above 500 saves 20%, leisure above 300 saves 30%
pub fn default_trend_rules() -> Vec<TrendRule> {
    vec![
        TrendRule {
            category: Category::Food,
            threshold: Decimal::from(500),
            savings_rate: Decimal::new(2, 1),
            message: "Your food spending is high. Consider cooking at home more often.".to_string(),
        },
        TrendRule {
            category: Category::Leisure,
            threshold: Decimal::from(300),
            savings_rate: Decimal::new(3, 1),
            message: "You could save by looking for free or cheaper leisure options.".to_string(),
        },
    ]
}

/// Evaluate `rules` in order against the ledger
pub fn trend_suggestions(transactions: &[Transaction], rules: &[TrendRule]) -> Vec<TrendSuggestion> {
    rules
        .iter()
        .filter_map(|rule| {
            let spent = category_spent(transactions, rule.category);
            (spent > rule.threshold).then(|| TrendSuggestion {
                category: rule.category,
                label: rule.category.label().to_string(),
                message: rule.message.clone(),
                spent,
                estimated_savings: spent.saturating_mul(rule.savings_rate),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TransactionDraft, TransactionKind};
    use chrono::NaiveDate;

    fn expense(amount: i64, category: Category) -> Transaction {
        Transaction::from_draft(TransactionDraft::new(
            TransactionKind::Expense,
            Decimal::from(amount),
            category,
            "",
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        ))
    }

    #[test]
    fn test_threshold_is_strict() {
        let rules = default_trend_rules();
        let at_threshold = vec![expense(500, Category::Food), expense(300, Category::Leisure)];
        assert!(trend_suggestions(&at_threshold, &rules).is_empty());
    }

    #[test]
    fn test_estimated_savings() {
        let rules = default_trend_rules();
        let ledger = vec![
            expense(400, Category::Leisure),
            expense(350, Category::Food),
            expense(250, Category::Food),
        ];
        let suggestions = trend_suggestions(&ledger, &rules);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].category, Category::Food);
        assert_eq!(suggestions[0].estimated_savings, Decimal::from(120));
        assert_eq!(suggestions[1].category, Category::Leisure);
        assert_eq!(suggestions[1].estimated_savings, Decimal::from(120));
    }

    #[test]
    fn test_income_does_not_count() {
        let rules = default_trend_rules();
        let ledger = vec![Transaction::from_draft(TransactionDraft::new(
            TransactionKind::Income,
            Decimal::from(9000),
            Category::Other,
            "",
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        ))];
        assert!(trend_suggestions(&ledger, &rules).is_empty());
    }
}
