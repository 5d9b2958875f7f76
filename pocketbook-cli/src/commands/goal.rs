//! Goal commands - savings goals and their progress

use anyhow::Result;
use clap::Subcommand;
use pocketbook_core::domain::GoalDraft;
use rust_decimal::Decimal;

use super::{
    get_context, log_command, parse_amount, parse_date, require_user, resolve_id, today,
    value_or_prompt,
};
use crate::output;

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: Option<String>,
        /// Target amount
        target: Option<String>,
        /// Amount already saved
        #[arg(long)]
        current: Option<String>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Change fields of a goal
    Edit {
        /// Goal id or unique prefix
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Remove a goal
    Rm {
        /// Goal id or unique prefix
        id: String,
    },
    /// Show goals with progress
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: GoalCommands) -> Result<()> {
    match command {
        GoalCommands::Add {
            name,
            target,
            current,
            deadline,
        } => run_add(name, target, current, deadline),
        GoalCommands::Edit {
            id,
            name,
            target,
            current,
            deadline,
        } => run_edit(&id, name, target, current, deadline),
        GoalCommands::Rm { id } => run_rm(&id),
        GoalCommands::List { json } => run_list(json),
    }
}

fn run_add(
    name: Option<String>,
    target: Option<String>,
    current: Option<String>,
    deadline: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let draft = GoalDraft {
        name: value_or_prompt(name, "Goal name")?,
        target_amount: parse_amount(&value_or_prompt(target, "Target amount")?)?,
        current_amount: match current {
            Some(c) => parse_amount(&c)?,
            None => Decimal::ZERO,
        },
        deadline: parse_date(&value_or_prompt(deadline, "Deadline (YYYY-MM-DD)")?)?,
    };
    let name = draft.name.clone();

    let id = ctx.workspace_service.update(user.id, |ws| ws.add_goal(draft))?;
    log_command("goal add");
    output::success(&format!("Created goal '{}' ({})", name, output::short_id(&id)));
    Ok(())
}

fn run_edit(
    id: &str,
    name: Option<String>,
    target: Option<String>,
    current: Option<String>,
    deadline: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let target = target.as_deref().map(parse_amount).transpose()?;
    let current = current.as_deref().map(parse_amount).transpose()?;
    let deadline = deadline.as_deref().map(parse_date).transpose()?;

    let workspace = ctx.workspace_service.load(user.id)?;
    let Ok(id) = resolve_id(id, workspace.goals().iter().map(|g| g.id)) else {
        output::warning("No matching goal; nothing changed");
        return Ok(());
    };

    let updated = ctx.workspace_service.update(user.id, |ws| {
        let Some(goal) = ws.goal(id) else {
            return Ok(false);
        };
        let draft = GoalDraft {
            name: name.unwrap_or_else(|| goal.name.clone()),
            target_amount: target.unwrap_or(goal.target_amount),
            current_amount: current.unwrap_or(goal.current_amount),
            deadline: deadline.unwrap_or(goal.deadline),
        };
        ws.update_goal(id, draft)
    })?;

    if updated {
        log_command("goal edit");
        output::success(&format!("Updated goal {}", output::short_id(&id)));
    } else {
        output::warning("No matching goal; nothing changed");
    }
    Ok(())
}

fn run_rm(id: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let workspace = ctx.workspace_service.load(user.id)?;
    let Ok(id) = resolve_id(id, workspace.goals().iter().map(|g| g.id)) else {
        output::warning("No matching goal; nothing changed");
        return Ok(());
    };

    if ctx.workspace_service.update(user.id, |ws| Ok(ws.delete_goal(id)))? {
        log_command("goal rm");
        output::success(&format!("Removed goal {}", output::short_id(&id)));
    } else {
        output::warning("No matching goal; nothing changed");
    }
    Ok(())
}

fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;
    let workspace = ctx.workspace_service.load(user.id)?;
    let report = ctx.report_service.build(&workspace, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&report.goals)?);
        return Ok(());
    }

    if report.goals.is_empty() {
        println!("No savings goals yet. Create one with 'pb goal add'.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Goal", "Saved", "Target", "Progress", "", "Deadline"]);
    for g in &report.goals {
        table.add_row(vec![
            output::short_id(&g.id),
            g.name.clone(),
            output::money(g.current_amount),
            output::money(g.target_amount),
            output::percent(g.percent),
            output::bar(g.display_percent),
            g.deadline.to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
