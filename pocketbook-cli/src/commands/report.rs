//! Report command - category breakdown, budgets, goals, bills and tips

use anyhow::Result;
use colored::Colorize;
use pocketbook_core::domain::CategoryTotal;
use pocketbook_core::services::Report;

use super::{get_context, require_user, today};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;
    let workspace = ctx.workspace_service.load(user.id)?;
    let report = ctx.report_service.build(&workspace, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_breakdown(title: &str, totals: &[CategoryTotal]) {
    println!("{}", title.bold());
    if totals.is_empty() {
        println!("  (none)");
        return;
    }
    let mut table = output::create_table();
    table.set_header(vec!["Category", "Total"]);
    for t in totals {
        table.add_row(vec![t.label.clone(), output::money(t.total)]);
    }
    println!("{}", table);
}

fn print_report(report: &Report) {
    let summary = &report.summary;
    println!("{} {}", "Report for".bold(), report.generated_on);
    println!(
        "Income {}  Expenses {}  Balance {}  Savings rate {:.1}%",
        output::money(summary.total_income).green(),
        output::money(summary.total_expense).red(),
        output::money(summary.balance).bold(),
        summary.savings_rate
    );
    println!();

    print_breakdown("Expenses by category", &report.expenses_by_category);
    println!();
    print_breakdown("Income by category", &report.income_by_category);

    if !report.budgets.is_empty() {
        println!();
        println!("{}", "Budgets".bold());
        for b in &report.budgets {
            println!(
                "  {:<14} {} {:>7}  {} of {}",
                b.label,
                output::level_bar(b.bar_percent, b.level),
                output::percent(b.percent),
                output::money(b.spent),
                output::money(b.limit)
            );
        }
    }

    if !report.goals.is_empty() {
        println!();
        println!("{}", "Savings goals".bold());
        for g in &report.goals {
            println!(
                "  {:<20} {} {:>7}  due {}",
                g.name,
                output::bar(g.display_percent),
                output::percent(g.percent),
                g.deadline
            );
        }
    }

    if !report.reminders.is_empty() {
        println!();
        println!("{}", "Payment reminders".bold());
        for r in &report.reminders {
            let line = format!(
                "  {} {:<20} {}",
                r.due_date,
                r.description,
                output::money(r.amount)
            );
            if r.overdue {
                println!("{} {}", line.red(), "OVERDUE".red().bold());
            } else {
                println!("{}", line);
            }
        }
    }

    println!();
    println!("{}", "Saving tips".bold());
    if report.suggestions.is_empty() {
        println!("  Your spending looks balanced. Keep it up!");
    } else {
        for s in &report.suggestions {
            println!(
                "  {} {} (spent {}, could save about {})",
                "*".cyan(),
                s.message,
                output::money(s.spent),
                output::money(s.estimated_savings)
            );
        }
        println!(
            "  Total potential savings: {}",
            output::money(report.total_potential_savings).green()
        );
    }
}
