//! Reminder commands - upcoming and overdue bills

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use pocketbook_core::domain::ReminderDraft;

use super::{
    get_context, log_command, parse_amount, parse_date, require_user, resolve_id, today,
    value_or_prompt,
};
use crate::output;

#[derive(Subcommand)]
pub enum ReminderCommands {
    /// Add a payment reminder
    Add {
        /// What is due
        description: Option<String>,
        /// Amount due
        amount: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Repeats every month
        #[arg(long)]
        recurring: bool,
    },
    /// Change fields of a reminder
    Edit {
        /// Reminder id or unique prefix
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        recurring: Option<bool>,
    },
    /// Remove a reminder
    Rm {
        /// Reminder id or unique prefix
        id: String,
    },
    /// Show reminders, overdue first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ReminderCommands) -> Result<()> {
    match command {
        ReminderCommands::Add {
            description,
            amount,
            due,
            recurring,
        } => run_add(description, amount, due, recurring),
        ReminderCommands::Edit {
            id,
            description,
            amount,
            due,
            recurring,
        } => run_edit(&id, description, amount, due, recurring),
        ReminderCommands::Rm { id } => run_rm(&id),
        ReminderCommands::List { json } => run_list(json),
    }
}

fn run_add(
    description: Option<String>,
    amount: Option<String>,
    due: Option<String>,
    recurring: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let draft = ReminderDraft {
        description: value_or_prompt(description, "Description")?,
        amount: parse_amount(&value_or_prompt(amount, "Amount")?)?,
        due_date: parse_date(&value_or_prompt(due, "Due date (YYYY-MM-DD)")?)?,
        recurring,
    };
    let overdue = draft.due_date < today();

    let id = ctx
        .workspace_service
        .update(user.id, |ws| ws.add_reminder(draft))?;
    log_command("reminder add");

    output::success(&format!("Added reminder {}", output::short_id(&id)));
    if overdue {
        output::warning("This reminder is already overdue");
    }
    Ok(())
}

fn run_edit(
    id: &str,
    description: Option<String>,
    amount: Option<String>,
    due: Option<String>,
    recurring: Option<bool>,
) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let amount = amount.as_deref().map(parse_amount).transpose()?;
    let due = due.as_deref().map(parse_date).transpose()?;

    let workspace = ctx.workspace_service.load(user.id)?;
    let Ok(id) = resolve_id(id, workspace.reminders().iter().map(|r| r.id)) else {
        output::warning("No matching reminder; nothing changed");
        return Ok(());
    };

    let updated = ctx.workspace_service.update(user.id, |ws| {
        let Some(reminder) = ws.reminder(id) else {
            return Ok(false);
        };
        let draft = ReminderDraft {
            description: description.unwrap_or_else(|| reminder.description.clone()),
            amount: amount.unwrap_or(reminder.amount),
            due_date: due.unwrap_or(reminder.due_date),
            recurring: recurring.unwrap_or(reminder.recurring),
        };
        ws.update_reminder(id, draft)
    })?;

    if updated {
        log_command("reminder edit");
        output::success(&format!("Updated reminder {}", output::short_id(&id)));
    } else {
        output::warning("No matching reminder; nothing changed");
    }
    Ok(())
}

fn run_rm(id: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let workspace = ctx.workspace_service.load(user.id)?;
    let Ok(id) = resolve_id(id, workspace.reminders().iter().map(|r| r.id)) else {
        output::warning("No matching reminder; nothing changed");
        return Ok(());
    };

    if ctx
        .workspace_service
        .update(user.id, |ws| Ok(ws.delete_reminder(id)))?
    {
        log_command("reminder rm");
        output::success(&format!("Removed reminder {}", output::short_id(&id)));
    } else {
        output::warning("No matching reminder; nothing changed");
    }
    Ok(())
}

fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;
    let workspace = ctx.workspace_service.load(user.id)?;
    let report = ctx.report_service.build(&workspace, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&report.reminders)?);
        return Ok(());
    }

    if report.reminders.is_empty() {
        println!("No reminders yet. Add one with 'pb reminder add'.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Description", "Amount", "Due", "Recurring", "Status"]);
    for r in &report.reminders {
        let status = if r.overdue {
            "OVERDUE".red().bold().to_string()
        } else {
            "upcoming".to_string()
        };
        table.add_row(vec![
            output::short_id(&r.id),
            r.description.clone(),
            output::money(r.amount),
            r.due_date.to_string(),
            if r.recurring { "monthly" } else { "-" }.to_string(),
            status,
        ]);
    }
    println!("{}", table);
    Ok(())
}
