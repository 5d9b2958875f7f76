//! Workspace - one user's ledger, budgets, goals and reminders
//!
//! Every ledger mutation re-derives the `spent` field of every budget
//! before returning.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::budget::Budget;
use super::category::{Category, TransactionKind};
use super::goal::{GoalDraft, SavingsGoal};
use super::reminder::{PaymentReminder, ReminderDraft};
use super::result::{Error, Result};
use super::summary::{self, CategoryTotal, LedgerSummary};
use super::transaction::{ensure_within_max, Transaction, TransactionDraft};
use super::trend::{trend_suggestions, TrendRule, TrendSuggestion};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    budgets: Vec<Budget>,
    #[serde(default)]
    goals: Vec<SavingsGoal>,
    #[serde(default)]
    reminders: Vec<PaymentReminder>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Transactions in insertion order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions sorted by date, newest first
    pub fn transactions_by_date(&self) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Append a transaction and return its new id
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Uuid> {
        draft.validate()?;
        let tx = Transaction::from_draft(draft);
        let id = tx.id;
        self.transactions.push(tx);
        self.recompute_budgets();
        Ok(id)
    }

    /// Replace the fields of transaction `id`
    ///
    /// Returns `Ok(false)` when no such transaction exists.
    pub fn update_transaction(&mut self, id: Uuid, draft: TransactionDraft) -> Result<bool> {
        draft.validate()?;
        let Some(tx) = self.transactions.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        tx.apply(draft);
        self.recompute_budgets();
        Ok(true)
    }

    /// Remove transaction `id`; returns whether anything was removed
    pub fn delete_transaction(&mut self, id: Uuid) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        let removed = self.transactions.len() != before;
        if removed {
            self.recompute_budgets();
        }
        removed
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary::from_transactions(&self.transactions)
    }

    pub fn total_income(&self) -> Decimal {
        summary::total_income(&self.transactions)
    }

    pub fn total_expense(&self) -> Decimal {
        summary::total_expense(&self.transactions)
    }

    pub fn balance(&self) -> Decimal {
        summary::balance(&self.transactions)
    }

    pub fn by_category(&self, kind: TransactionKind) -> Vec<CategoryTotal> {
        summary::by_category(&self.transactions, kind)
    }

    pub fn budget_spent(&self, category: Category) -> Decimal {
        summary::category_spent(&self.transactions, category)
    }

    pub fn trend_suggestions(&self, rules: &[TrendRule]) -> Vec<TrendSuggestion> {
        trend_suggestions(&self.transactions, rules)
    }

    /// Re-derive `spent` on every budget from the current ledger
    pub fn recompute_budgets(&mut self) {
        for budget in &mut self.budgets {
            budget.spent = summary::category_spent(&self.transactions, budget.category);
        }
    }

    // =========================================================================
    // Budgets
    // =========================================================================

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn budget(&self, category: Category) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.category == category)
    }

    /// Update the limit of the category's budget, or create it
    ///
    /// A new budget starts with `spent` taken from the current ledger.
    pub fn upsert_budget(&mut self, category: Category, limit: Decimal) -> Result<()> {
        if !category.belongs_to(TransactionKind::Expense) {
            return Err(Error::validation(format!(
                "Budgets can only be set for expense categories, not '{}'",
                category
            )));
        }
        if limit <= Decimal::ZERO {
            return Err(Error::validation("Budget limit must be greater than zero"));
        }
        ensure_within_max(limit, "Budget limit")?;

        if let Some(existing) = self.budgets.iter_mut().find(|b| b.category == category) {
            existing.limit = limit;
        } else {
            let spent = summary::category_spent(&self.transactions, category);
            self.budgets.push(Budget::new(category, limit, spent));
        }
        Ok(())
    }

    /// Remove the category's budget; the ledger is untouched
    pub fn delete_budget(&mut self, category: Category) -> bool {
        let before = self.budgets.len();
        self.budgets.retain(|b| b.category != category);
        self.budgets.len() != before
    }

    // =========================================================================
    // Savings goals
    // =========================================================================

    pub fn goals(&self) -> &[SavingsGoal] {
        &self.goals
    }

    pub fn goal(&self, id: Uuid) -> Option<&SavingsGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn add_goal(&mut self, draft: GoalDraft) -> Result<Uuid> {
        draft.validate()?;
        let goal = SavingsGoal::from_draft(draft);
        let id = goal.id;
        self.goals.push(goal);
        Ok(id)
    }

    pub fn update_goal(&mut self, id: Uuid, draft: GoalDraft) -> Result<bool> {
        draft.validate()?;
        match self.goals.iter_mut().find(|g| g.id == id) {
            Some(goal) => {
                goal.apply(draft);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_goal(&mut self, id: Uuid) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        self.goals.len() != before
    }

    // =========================================================================
    // Payment reminders
    // =========================================================================

    pub fn reminders(&self) -> &[PaymentReminder] {
        &self.reminders
    }

    pub fn reminder(&self, id: Uuid) -> Option<&PaymentReminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    /// Overdue reminders first, then by due date
    pub fn reminders_by_urgency(&self, today: NaiveDate) -> Vec<&PaymentReminder> {
        let mut sorted: Vec<&PaymentReminder> = self.reminders.iter().collect();
        sorted.sort_by_key(|r| (!r.is_overdue_on(today), r.due_date));
        sorted
    }

    pub fn add_reminder(&mut self, draft: ReminderDraft) -> Result<Uuid> {
        draft.validate()?;
        let reminder = PaymentReminder::from_draft(draft);
        let id = reminder.id;
        self.reminders.push(reminder);
        Ok(id)
    }

    pub fn update_reminder(&mut self, id: Uuid, draft: ReminderDraft) -> Result<bool> {
        draft.validate()?;
        match self.reminders.iter_mut().find(|r| r.id == id) {
            Some(reminder) => {
                reminder.apply(draft);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_reminder(&mut self, id: Uuid) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        self.reminders.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_AMOUNT;
    use chrono::Duration;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn income(amount: i64) -> TransactionDraft {
        TransactionDraft::new(
            TransactionKind::Income,
            Decimal::from(amount),
            Category::Salary,
            "Salary",
            date(5),
        )
    }

    fn expense(amount: i64, category: Category) -> TransactionDraft {
        TransactionDraft::new(
            TransactionKind::Expense,
            Decimal::from(amount),
            category,
            "Expense",
            date(12),
        )
    }

    fn assert_consistent(ws: &Workspace) {
        assert_eq!(ws.balance(), ws.total_income() - ws.total_expense());
        for budget in ws.budgets() {
            assert_eq!(budget.spent, ws.budget_spent(budget.category));
        }
    }

    #[test]
    fn test_scenario_ledger_and_budget() {
        let mut ws = Workspace::new();
        ws.add_transaction(income(100)).unwrap();
        ws.add_transaction(expense(40, Category::Food)).unwrap();

        assert_eq!(ws.total_income(), Decimal::from(100));
        assert_eq!(ws.total_expense(), Decimal::from(40));
        assert_eq!(ws.balance(), Decimal::from(60));
        assert_eq!(ws.by_category(TransactionKind::Expense)[0].total, Decimal::from(40));

        ws.upsert_budget(Category::Food, Decimal::from(800)).unwrap();
        let budget = ws.budget(Category::Food).unwrap();
        assert_eq!(budget.spent, Decimal::from(40));
        assert_eq!(budget.utilization_percent(), Some(Decimal::from(5)));
    }

    #[test]
    fn test_budget_follows_every_ledger_mutation() {
        let mut ws = Workspace::new();
        ws.upsert_budget(Category::Transport, Decimal::from(400)).unwrap();
        assert_consistent(&ws);

        let id = ws.add_transaction(expense(150, Category::Transport)).unwrap();
        assert_eq!(ws.budget(Category::Transport).unwrap().spent, Decimal::from(150));
        assert_consistent(&ws);

        ws.update_transaction(id, expense(90, Category::Food)).unwrap();
        assert_eq!(ws.budget(Category::Transport).unwrap().spent, Decimal::ZERO);
        assert_consistent(&ws);

        ws.update_transaction(id, expense(75, Category::Transport)).unwrap();
        assert_eq!(ws.budget(Category::Transport).unwrap().spent, Decimal::from(75));

        assert!(ws.delete_transaction(id));
        assert_eq!(ws.budget(Category::Transport).unwrap().spent, Decimal::ZERO);
        assert_consistent(&ws);
    }

    #[test]
    fn test_upsert_existing_budget_keeps_spent() {
        let mut ws = Workspace::new();
        ws.add_transaction(expense(350, Category::Food)).unwrap();
        ws.upsert_budget(Category::Food, Decimal::from(800)).unwrap();
        ws.upsert_budget(Category::Food, Decimal::from(500)).unwrap();

        assert_eq!(ws.budgets().len(), 1);
        let budget = ws.budget(Category::Food).unwrap();
        assert_eq!(budget.limit, Decimal::from(500));
        assert_eq!(budget.spent, Decimal::from(350));
    }

    #[test]
    fn test_upsert_budget_validation() {
        let mut ws = Workspace::new();
        assert!(ws.upsert_budget(Category::Salary, Decimal::from(100)).is_err());
        assert!(ws.upsert_budget(Category::Food, Decimal::ZERO).is_err());
        assert!(ws.upsert_budget(Category::Food, MAX_AMOUNT + Decimal::ONE).is_err());
        assert!(ws.budgets().is_empty());
    }

    #[test]
    fn test_oversized_amounts_are_rejected_before_they_reach_totals() {
        let mut ws = Workspace::new();
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let mut draft = income(1);
        draft.amount = huge;

        assert!(ws.add_transaction(draft.clone()).is_err());
        assert!(ws.add_transaction(draft).is_err());
        assert_eq!(ws.total_income(), Decimal::ZERO);

        // The largest accepted amounts still add up without overflow
        for _ in 0..3 {
            let mut max = income(1);
            max.amount = MAX_AMOUNT;
            ws.add_transaction(max).unwrap();
        }
        ws.add_transaction(expense(1, Category::Food)).unwrap();
        ws.upsert_budget(Category::Food, Decimal::new(1, 2)).unwrap();
        assert_eq!(ws.total_income(), MAX_AMOUNT * Decimal::from(3));
        let food = ws.budget(Category::Food).unwrap();
        assert_eq!(food.utilization_percent(), Some(Decimal::from(10000)));
        assert_consistent(&ws);
    }

    #[test]
    fn test_invalid_transaction_leaves_ledger_unchanged() {
        let mut ws = Workspace::new();
        let id = ws.add_transaction(income(100)).unwrap();
        let before = ws.clone();

        assert!(ws.add_transaction(expense(10, Category::Salary)).is_err());
        assert!(ws.update_transaction(id, expense(-5, Category::Food)).is_err());
        assert_eq!(ws, before);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut ws = Workspace::new();
        ws.add_transaction(income(100)).unwrap();
        ws.upsert_budget(Category::Food, Decimal::from(800)).unwrap();
        let before = ws.clone();
        let missing = Uuid::new_v4();

        assert!(!ws.delete_transaction(missing));
        assert!(!ws.update_transaction(missing, income(5)).unwrap());
        assert!(!ws.delete_budget(Category::Leisure));
        assert!(!ws.delete_goal(missing));
        assert!(!ws.delete_reminder(missing));
        assert_eq!(ws, before);
    }

    #[test]
    fn test_delete_budget_keeps_ledger() {
        let mut ws = Workspace::new();
        ws.add_transaction(expense(40, Category::Food)).unwrap();
        ws.upsert_budget(Category::Food, Decimal::from(800)).unwrap();
        assert!(ws.delete_budget(Category::Food));
        assert!(ws.budgets().is_empty());
        assert_eq!(ws.transactions().len(), 1);
    }

    #[test]
    fn test_goal_crud() {
        let mut ws = Workspace::new();
        let draft = GoalDraft {
            name: "Emergency fund".to_string(),
            target_amount: Decimal::from(10000),
            current_amount: Decimal::from(3500),
            deadline: date(30),
        };
        let id = ws.add_goal(draft.clone()).unwrap();

        let mut updated = draft;
        updated.current_amount = Decimal::from(4000);
        assert!(ws.update_goal(id, updated).unwrap());
        assert_eq!(ws.goal(id).unwrap().current_amount, Decimal::from(4000));

        assert!(ws.delete_goal(id));
        assert!(ws.goals().is_empty());
    }

    #[test]
    fn test_reminders_by_urgency() {
        let today = date(10);
        let mut ws = Workspace::new();
        let mk = |description: &str, due_date: NaiveDate| ReminderDraft {
            description: description.to_string(),
            amount: Decimal::from(100),
            due_date,
            recurring: false,
        };
        ws.add_reminder(mk("Credit card", today + Duration::days(5))).unwrap();
        ws.add_reminder(mk("Internet", today - Duration::days(5))).unwrap();
        ws.add_reminder(mk("Rent", today)).unwrap();

        let order: Vec<&str> = ws
            .reminders_by_urgency(today)
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(order, vec!["Internet", "Rent", "Credit card"]);
    }

    #[test]
    fn test_transactions_by_date() {
        let mut ws = Workspace::new();
        ws.add_transaction(income(100)).unwrap();
        ws.add_transaction(expense(40, Category::Food)).unwrap();
        let dates: Vec<NaiveDate> = ws.transactions_by_date().iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(12), date(5)]);
    }
}
