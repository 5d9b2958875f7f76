//! Transaction kinds and the fixed category lists

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// The categories a transaction of this kind may use, in display order
    pub fn categories(&self) -> &'static [Category] {
        match self {
            TransactionKind::Income => INCOME_CATEGORIES,
            TransactionKind::Expense => EXPENSE_CATEGORIES,
        }
    }

    /// Default category preselected for a new transaction of this kind
    pub fn default_category(&self) -> Category {
        match self {
            TransactionKind::Income => Category::Salary,
            TransactionKind::Expense => Category::Food,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "receita" => Ok(TransactionKind::Income),
            "expense" | "despesa" => Ok(TransactionKind::Expense),
            other => Err(Error::validation(format!("Unknown transaction kind: {}", other))),
        }
    }
}

/// Transaction category
///
/// Serialized with the slugs used in stored data. `Other` is shared by
/// both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "alimentacao")]
    Food,
    #[serde(rename = "transporte")]
    Transport,
    #[serde(rename = "moradia")]
    Housing,
    #[serde(rename = "saude")]
    Health,
    #[serde(rename = "lazer")]
    Leisure,
    #[serde(rename = "educacao")]
    Education,
    #[serde(rename = "outros")]
    Other,
    #[serde(rename = "salario")]
    Salary,
    #[serde(rename = "freelance")]
    Freelance,
    #[serde(rename = "investimentos")]
    Investments,
}

pub const EXPENSE_CATEGORIES: &[Category] = &[
    Category::Food,
    Category::Transport,
    Category::Housing,
    Category::Health,
    Category::Leisure,
    Category::Education,
    Category::Other,
];

pub const INCOME_CATEGORIES: &[Category] = &[
    Category::Salary,
    Category::Freelance,
    Category::Investments,
    Category::Other,
];

impl Category {
    /// Stored slug
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Food => "alimentacao",
            Category::Transport => "transporte",
            Category::Housing => "moradia",
            Category::Health => "saude",
            Category::Leisure => "lazer",
            Category::Education => "educacao",
            Category::Other => "outros",
            Category::Salary => "salario",
            Category::Freelance => "freelance",
            Category::Investments => "investimentos",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Housing => "Housing",
            Category::Health => "Health",
            Category::Leisure => "Leisure",
            Category::Education => "Education",
            Category::Other => "Other",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investments => "Investments",
        }
    }

    pub fn belongs_to(&self, kind: TransactionKind) -> bool {
        kind.categories().contains(self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts the stored slug or the English label, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        EXPENSE_CATEGORIES
            .iter()
            .chain(INCOME_CATEGORIES.iter())
            .find(|c| c.slug() == needle || c.label().to_lowercase() == needle)
            .copied()
            .ok_or_else(|| Error::validation(format!("Unknown category: {}", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_shared() {
        assert!(Category::Other.belongs_to(TransactionKind::Income));
        assert!(Category::Other.belongs_to(TransactionKind::Expense));
        assert!(!Category::Food.belongs_to(TransactionKind::Income));
        assert!(!Category::Salary.belongs_to(TransactionKind::Expense));
    }

    #[test]
    fn test_parse_slug_and_label() {
        assert_eq!("alimentacao".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("Food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(" investimentos ".parse::<Category>().unwrap(), Category::Investments);
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_slugs() {
        let json = serde_json::to_string(&Category::Leisure).unwrap();
        assert_eq!(json, "\"lazer\"");
        let kind: TransactionKind = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(kind, TransactionKind::Expense);
    }
}
