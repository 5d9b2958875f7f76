//! Report service - the derived views of a workspace in one structure

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::summary::saturating_sum;
use crate::domain::{
    Category, CategoryTotal, LedgerSummary, TransactionKind, TrendRule, TrendSuggestion,
    UtilizationLevel, Workspace,
};

/// Percentages are reported with one decimal place
const PERCENT_DP: u32 = 1;

/// Report service for dashboard and report output
pub struct ReportService {
    trend_rules: Vec<TrendRule>,
}

impl ReportService {
    pub fn new(trend_rules: Vec<TrendRule>) -> Self {
        Self { trend_rules }
    }

    pub fn trend_rules(&self) -> &[TrendRule] {
        &self.trend_rules
    }

    /// Compute every derived view as of `today`
    pub fn build(&self, workspace: &Workspace, today: NaiveDate) -> Report {
        let suggestions = workspace.trend_suggestions(&self.trend_rules);
        let total_potential_savings =
            saturating_sum(suggestions.iter().map(|s| s.estimated_savings));

        Report {
            generated_on: today,
            summary: workspace.summary(),
            expenses_by_category: workspace.by_category(TransactionKind::Expense),
            income_by_category: workspace.by_category(TransactionKind::Income),
            budgets: workspace
                .budgets()
                .iter()
                .map(|b| BudgetStatus {
                    category: b.category,
                    label: b.category.label().to_string(),
                    limit: b.limit,
                    spent: b.spent,
                    remaining: b.remaining(),
                    percent: b.utilization_percent().map(|p| p.round_dp(PERCENT_DP)),
                    bar_percent: b.bar_percent().round_dp(PERCENT_DP),
                    level: b.level(),
                })
                .collect(),
            goals: workspace
                .goals()
                .iter()
                .map(|g| GoalProgress {
                    id: g.id,
                    name: g.name.clone(),
                    target_amount: g.target_amount,
                    current_amount: g.current_amount,
                    remaining: g.remaining(),
                    percent: g.progress_percent().map(|p| p.round_dp(PERCENT_DP)),
                    display_percent: g.display_percent().round_dp(PERCENT_DP),
                    deadline: g.deadline,
                })
                .collect(),
            reminders: workspace
                .reminders_by_urgency(today)
                .into_iter()
                .map(|r| ReminderStatus {
                    id: r.id,
                    description: r.description.clone(),
                    amount: r.amount,
                    due_date: r.due_date,
                    recurring: r.recurring,
                    overdue: r.is_overdue_on(today),
                })
                .collect(),
            suggestions,
            total_potential_savings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_on: NaiveDate,
    pub summary: LedgerSummary,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
    pub budgets: Vec<BudgetStatus>,
    pub goals: Vec<GoalProgress>,
    pub reminders: Vec<ReminderStatus>,
    pub suggestions: Vec<TrendSuggestion>,
    pub total_potential_savings: Decimal,
}

impl Report {
    pub fn overdue_count(&self) -> usize {
        self.reminders.iter().filter(|r| r.overdue).count()
    }
}

#[derive(Debug, Serialize)]
pub struct BudgetStatus {
    pub category: Category,
    pub label: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Uncapped; `None` for a zero limit
    pub percent: Option<Decimal>,
    /// Capped at 100
    pub bar_percent: Decimal,
    pub level: UtilizationLevel,
}

#[derive(Debug, Serialize)]
pub struct GoalProgress {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub remaining: Decimal,
    pub percent: Option<Decimal>,
    pub display_percent: Decimal,
    pub deadline: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ReminderStatus {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub recurring: bool,
    pub overdue: bool,
}
