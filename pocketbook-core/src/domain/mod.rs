//! Core domain entities
//!
//! All business entities and derived aggregates are defined here. These are
//! pure data structures with validation logic - no I/O or external dependencies.

mod budget;
mod category;
mod goal;
mod preferences;
mod reminder;
pub mod result;
pub mod summary;
mod transaction;
pub mod trend;
mod user;
mod workspace;

pub use budget::{Budget, UtilizationLevel, CRITICAL_THRESHOLD_PERCENT, WARNING_THRESHOLD_PERCENT};
pub use category::{Category, TransactionKind, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use goal::{GoalDraft, SavingsGoal};
pub use preferences::Theme;
pub use reminder::{PaymentReminder, ReminderDraft};
pub use summary::{CategoryTotal, LedgerSummary};
pub use transaction::{Transaction, TransactionDraft, MAX_AMOUNT};
pub use trend::{default_trend_rules, TrendRule, TrendSuggestion};
pub use user::{SessionUser, User};
pub use workspace::Workspace;
