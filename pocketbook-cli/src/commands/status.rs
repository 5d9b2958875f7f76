//! Status command - dashboard summary of the ledger

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use pocketbook_core::domain::{UtilizationLevel, WARNING_THRESHOLD_PERCENT};

use super::{get_context, require_user, today};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;
    let workspace = ctx.workspace_service.load(user.id)?;
    let report = ctx.report_service.build(&workspace, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
        return Ok(());
    }

    println!("{}", format!("Hello, {}", user.name).bold());
    if ctx.config.demo_mode {
        output::warning("Demo mode is on");
    }
    println!();

    let summary = &report.summary;
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Income".to_string(), output::money(summary.total_income)]);
    table.add_row(vec!["Expenses".to_string(), output::money(summary.total_expense)]);
    table.add_row(vec!["Balance".to_string(), output::money(summary.balance)]);
    table.add_row(vec![
        "Savings rate".to_string(),
        format!("{:.1}%", summary.savings_rate),
    ]);
    table.add_row(vec![
        "Transactions".to_string(),
        summary.transaction_count.to_string(),
    ]);
    println!("{}", table);
    println!();

    let over_warning = report
        .budgets
        .iter()
        .filter(|b| b.level != UtilizationLevel::Healthy)
        .count();
    if over_warning > 0 {
        output::warning(&format!("{} budget(s) above {}%", over_warning, WARNING_THRESHOLD_PERCENT));
    }
    let overdue = report.overdue_count();
    if overdue > 0 {
        println!("{}", format!("{} overdue payment(s)", overdue).red());
    }
    if !report.suggestions.is_empty() {
        output::info(&format!(
            "{} saving tip(s), see 'pb report'",
            report.suggestions.len()
        ));
    }

    Ok(())
}
