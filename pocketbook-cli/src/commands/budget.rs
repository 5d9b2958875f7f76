//! Budget commands - per-category spending limits

use anyhow::Result;
use clap::Subcommand;
use pocketbook_core::domain::Category;

use super::{get_context, log_command, parse_amount, require_user, today};
use crate::output;

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create or replace the limit for an expense category
    Set {
        /// Expense category slug or name
        category: String,
        /// Monthly limit
        limit: String,
    },
    /// Remove the budget for a category
    Rm {
        category: String,
    },
    /// Show budgets with utilization
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: BudgetCommands) -> Result<()> {
    match command {
        BudgetCommands::Set { category, limit } => run_set(&category, &limit),
        BudgetCommands::Rm { category } => run_rm(&category),
        BudgetCommands::List { json } => run_list(json),
    }
}

fn run_set(category: &str, limit: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;
    let category: Category = category.parse()?;
    let limit = parse_amount(limit)?;

    let budget = ctx.workspace_service.update(user.id, |ws| {
        ws.upsert_budget(category, limit)?;
        Ok(ws.budget(category).cloned())
    })?;
    log_command("budget set");

    output::success(&format!(
        "Budget for {} set to {}",
        category.label(),
        output::money(limit)
    ));
    if let Some(b) = budget {
        println!(
            "  Spent so far: {} ({})",
            output::money(b.spent),
            output::percent(b.utilization_percent())
        );
    }
    Ok(())
}

fn run_rm(category: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;
    let category: Category = category.parse()?;

    let removed = ctx
        .workspace_service
        .update(user.id, |ws| Ok(ws.delete_budget(category)))?;
    if removed {
        log_command("budget rm");
        output::success(&format!("Removed budget for {}", category.label()));
    } else {
        output::warning(&format!("No budget for {}; nothing changed", category.label()));
    }
    Ok(())
}

fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;
    let workspace = ctx.workspace_service.load(user.id)?;
    let report = ctx.report_service.build(&workspace, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&report.budgets)?);
        return Ok(());
    }

    if report.budgets.is_empty() {
        println!("No budgets yet. Create one with 'pb budget set <category> <limit>'.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Category", "Spent", "Limit", "Used", "", "Remaining"]);
    for b in &report.budgets {
        table.add_row(vec![
            b.label.clone(),
            output::money(b.spent),
            output::money(b.limit),
            output::percent(b.percent),
            output::level_bar(b.bar_percent, b.level).to_string(),
            output::money(b.remaining),
        ]);
    }
    println!("{}", table);
    Ok(())
}
