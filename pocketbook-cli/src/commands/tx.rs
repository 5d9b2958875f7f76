//! Transaction commands - add, edit, remove and list ledger entries

use anyhow::Result;
use clap::Subcommand;
use dialoguer::{Input, Select};
use pocketbook_core::domain::{Category, TransactionDraft, TransactionKind};
use pocketbook_core::OperationResult;

use super::{
    get_context, log_command, parse_amount, parse_date, require_user, resolve_id, today,
    value_or_prompt,
};
use crate::output;

#[derive(Subcommand)]
pub enum TxCommands {
    /// Record an income or expense
    Add {
        /// income or expense
        kind: Option<String>,
        /// Amount (positive)
        amount: Option<String>,
        /// Category slug or name (prompted when omitted)
        #[arg(long, short)]
        category: Option<String>,
        /// Description
        #[arg(long, short)]
        description: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing transaction
    Edit {
        /// Transaction id or unique prefix
        id: String,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long, short)]
        category: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a transaction
    Rm {
        /// Transaction id or unique prefix
        id: String,
    },
    /// List transactions, newest first
    List {
        /// Only income or only expense
        #[arg(long)]
        kind: Option<String>,
        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: TxCommands) -> Result<()> {
    match command {
        TxCommands::Add {
            kind,
            amount,
            category,
            description,
            date,
            json,
        } => run_add(kind, amount, category, description, date, json),
        TxCommands::Edit {
            id,
            kind,
            amount,
            category,
            description,
            date,
        } => run_edit(&id, kind, amount, category, description, date),
        TxCommands::Rm { id } => run_rm(&id),
        TxCommands::List { kind, limit, json } => run_list(kind, limit, json),
    }
}

fn select_kind() -> Result<TransactionKind> {
    let kinds = [TransactionKind::Expense, TransactionKind::Income];
    let labels: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
    let index = Select::new()
        .with_prompt("Type")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(kinds[index])
}

fn select_category(kind: TransactionKind) -> Result<Category> {
    let categories = kind.categories();
    let labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();
    let index = Select::new()
        .with_prompt("Category")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(categories[index])
}

fn run_add(
    kind: Option<String>,
    amount: Option<String>,
    category: Option<String>,
    description: Option<String>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let kind = match kind {
        Some(k) => k.parse::<TransactionKind>()?,
        None => select_kind()?,
    };
    let amount = parse_amount(&value_or_prompt(amount, "Amount")?)?;
    let category = match category {
        Some(c) => c.parse::<Category>()?,
        None => select_category(kind)?,
    };
    let description = match description {
        Some(d) => d,
        None => Input::new()
            .with_prompt("Description")
            .allow_empty(true)
            .interact_text()?,
    };
    let date = match date {
        Some(d) => parse_date(&d)?,
        None => today(),
    };

    let draft = TransactionDraft::new(kind, amount, category, description, date);
    let id = ctx
        .workspace_service
        .update(user.id, |ws| ws.add_transaction(draft))?;
    log_command("tx add");

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(id))?);
    } else {
        output::success(&format!(
            "Added {} of {} ({})",
            kind,
            output::money(amount),
            output::short_id(&id)
        ));
    }
    Ok(())
}

fn run_edit(
    id: &str,
    kind: Option<String>,
    amount: Option<String>,
    category: Option<String>,
    description: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let kind = kind.map(|k| k.parse::<TransactionKind>()).transpose()?;
    let amount = amount.as_deref().map(parse_amount).transpose()?;
    let category = category.map(|c| c.parse::<Category>()).transpose()?;
    let date = date.as_deref().map(parse_date).transpose()?;

    let workspace = ctx.workspace_service.load(user.id)?;
    let Ok(id) = resolve_id(id, workspace.transactions().iter().map(|t| t.id)) else {
        output::warning("No matching transaction; nothing changed");
        return Ok(());
    };

    let updated = ctx.workspace_service.update(user.id, |ws| {
        let Some(current) = ws.transaction(id) else {
            return Ok(false);
        };

        let mut draft = TransactionDraft::new(
            current.kind,
            current.amount,
            current.category,
            current.description.clone(),
            current.date,
        );
        // Switching kind resets the category to the new kind's default
        if let Some(k) = kind.filter(|k| *k != draft.kind) {
            draft.kind = k;
            draft.category = k.default_category();
        }
        if let Some(a) = amount {
            draft.amount = a;
        }
        if let Some(c) = category {
            draft.category = c;
        }
        if let Some(d) = description {
            draft.description = d;
        }
        if let Some(d) = date {
            draft.date = d;
        }

        ws.update_transaction(id, draft)
    })?;

    if updated {
        log_command("tx edit");
        output::success(&format!("Updated transaction {}", output::short_id(&id)));
    } else {
        output::warning("No matching transaction; nothing changed");
    }
    Ok(())
}

fn run_rm(id: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let workspace = ctx.workspace_service.load(user.id)?;
    let Ok(id) = resolve_id(id, workspace.transactions().iter().map(|t| t.id)) else {
        output::warning("No matching transaction; nothing changed");
        return Ok(());
    };

    let removed = ctx
        .workspace_service
        .update(user.id, |ws| Ok(ws.delete_transaction(id)))?;
    if removed {
        log_command("tx rm");
        output::success(&format!("Removed transaction {}", output::short_id(&id)));
    } else {
        output::warning("No matching transaction; nothing changed");
    }
    Ok(())
}

fn run_list(kind: Option<String>, limit: Option<usize>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;
    let kind = kind.map(|k| k.parse::<TransactionKind>()).transpose()?;

    let workspace = ctx.workspace_service.load(user.id)?;
    let rows: Vec<_> = workspace
        .transactions_by_date()
        .into_iter()
        .filter(|t| kind.map_or(true, |k| t.kind == k))
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No transactions yet. Add one with 'pb tx add'.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Date", "Category", "Description", "Amount"]);
    for t in &rows {
        table.add_row(vec![
            output::short_id(&t.id),
            t.date.to_string(),
            t.category.label().to_string(),
            t.description.clone(),
            output::signed_money(t.signed_amount()).to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
