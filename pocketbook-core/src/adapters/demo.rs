//! Demo data for demo mode
//!
//! A small month of activity: salary and a freelance job against rent,
//! groceries and fuel, plus three budgets, two goals and three bills.
//! Dates are relative to `today` so the data never looks stale.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::{
    Category, GoalDraft, ReminderDraft, TransactionDraft, TransactionKind, Workspace,
};

pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_EMAIL: &str = "demo@pocketbook.local";
pub const DEMO_USER_PASSWORD: &str = "demo123";

fn demo_transactions(today: NaiveDate) -> Vec<TransactionDraft> {
    let day = |offset: i64| today - Duration::days(offset);
    vec![
        TransactionDraft::new(
            TransactionKind::Income,
            Decimal::from(5000),
            Category::Salary,
            "Monthly salary",
            day(20),
        ),
        TransactionDraft::new(
            TransactionKind::Expense,
            Decimal::from(1200),
            Category::Housing,
            "Rent",
            day(15),
        ),
        TransactionDraft::new(
            TransactionKind::Expense,
            Decimal::from(350),
            Category::Food,
            "Supermarket",
            day(13),
        ),
        TransactionDraft::new(
            TransactionKind::Expense,
            Decimal::from(150),
            Category::Transport,
            "Fuel",
            day(10),
        ),
        TransactionDraft::new(
            TransactionKind::Income,
            Decimal::from(800),
            Category::Freelance,
            "Web project",
            day(5),
        ),
    ]
}

/// Build the sample workspace
pub fn generate_demo_workspace(today: NaiveDate) -> Result<Workspace> {
    let mut workspace = Workspace::new();

    for draft in demo_transactions(today) {
        workspace.add_transaction(draft)?;
    }

    workspace.upsert_budget(Category::Food, Decimal::from(800))?;
    workspace.upsert_budget(Category::Transport, Decimal::from(400))?;
    workspace.upsert_budget(Category::Housing, Decimal::from(1500))?;

    workspace.add_goal(GoalDraft {
        name: "Vacation".to_string(),
        target_amount: Decimal::from(5000),
        current_amount: Decimal::from(1200),
        deadline: today + Duration::days(240),
    })?;
    workspace.add_goal(GoalDraft {
        name: "Emergency fund".to_string(),
        target_amount: Decimal::from(10000),
        current_amount: Decimal::from(3500),
        deadline: today + Duration::days(120),
    })?;

    workspace.add_reminder(ReminderDraft {
        description: "Rent".to_string(),
        amount: Decimal::from(1200),
        due_date: today + Duration::days(10),
        recurring: true,
    })?;
    workspace.add_reminder(ReminderDraft {
        description: "Credit card".to_string(),
        amount: Decimal::from(850),
        due_date: today + Duration::days(15),
        recurring: true,
    })?;
    workspace.add_reminder(ReminderDraft {
        description: "Internet".to_string(),
        amount: Decimal::from(120),
        due_date: today - Duration::days(2),
        recurring: true,
    })?;

    Ok(workspace)
}
