//! Logs command - inspect the local event log
//!
//! The log only ever holds event names, command names and error messages,
//! so everything here is safe to paste into a bug report.

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use pocketbook_core::services::logging::now_ms;
use pocketbook_core::services::{EventCount, LogFilter};
use pocketbook_core::{EntryPoint, LogEntry, LoggingService};

use super::get_data_dir;
use crate::output;

/// Longest error message shown in the table before truncation
const MESSAGE_WIDTH: usize = 60;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only entries with an error
        #[arg(long)]
        errors: bool,
        /// Only this event (e.g. login_failed)
        #[arg(long)]
        event: Option<String>,
        /// Only this command and its subcommands (e.g. tx)
        #[arg(long)]
        command: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old log entries
    Clear {
        /// Delete entries older than N days (0 deletes everything)
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Event counts, failing commands and database location
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn open_log() -> Result<LoggingService> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn truncate(message: &str, width: usize) -> String {
    if message.chars().count() <= width {
        return message.to_string();
    }
    let kept: String = message.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Cutoff timestamp for `clear`; zero days means "now", i.e. everything
fn cutoff_ms(older_than_days: i64) -> i64 {
    now_ms() - Duration::days(older_than_days.max(0)).num_milliseconds()
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List {
            limit,
            errors,
            event,
            command,
            json,
        } => run_list(
            LogFilter {
                event,
                command,
                errors_only: errors,
                limit,
            },
            json,
        ),
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => run_clear(older_than_days, force, json),
        LogsCommands::Stats { json } => run_stats(json),
    }
}

fn run_list(filter: LogFilter, json: bool) -> Result<()> {
    let log = open_log()?;
    let entries = log.find(&filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("No matching log entries.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Command", "Error"]);
    for entry in &entries {
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            event_label(entry),
            entry.command.clone().unwrap_or_default(),
            entry
                .error_message
                .as_deref()
                .map(|m| truncate(m, MESSAGE_WIDTH))
                .unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn event_label(entry: &LogEntry) -> String {
    if entry.error_message.is_some() {
        entry.event.red().to_string()
    } else {
        entry.event.clone()
    }
}

fn run_clear(older_than_days: i64, force: bool, json: bool) -> Result<()> {
    let log = open_log()?;

    if !force && !json {
        let prompt = if older_than_days <= 0 {
            "Delete all log entries?".to_string()
        } else {
            format!("Delete log entries older than {} days?", older_than_days)
        };
        if !Confirm::new().with_prompt(prompt).default(false).interact()? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = log.delete_before(cutoff_ms(older_than_days))?;
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        output::success(&format!("Deleted {} log entries", deleted));
    }
    Ok(())
}

fn counts_table(header: &str, counts: &[EventCount]) -> comfy_table::Table {
    let mut table = output::create_table();
    table.set_header(vec![header, "Count", "Last seen"]);
    for c in counts {
        table.add_row(vec![
            c.name.clone(),
            c.count.to_string(),
            format_timestamp(c.last_seen),
        ]);
    }
    table
}

fn run_stats(json: bool) -> Result<()> {
    let log = open_log()?;
    let total = log.count()?;
    let events = log.event_counts()?;
    let failures = log.failed_command_counts()?;
    let db_path = log.db_path().to_path_buf();
    let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "total_entries": total,
                "events": events,
                "failed_commands": failures,
                "database_path": db_path.to_string_lossy(),
                "database_size_bytes": size_bytes,
            })
        );
        return Ok(());
    }

    println!("{}", "Event Log".bold());
    println!("  Entries:  {}", total);
    println!("  Database: {} ({} bytes)", db_path.display(), size_bytes);

    if !events.is_empty() {
        println!();
        println!("{}", counts_table("Event", &events));
    }
    if !failures.is_empty() {
        println!();
        println!("{}", "Failing commands".red().bold());
        println!("{}", counts_table("Command", &failures));
    }
    Ok(())
}
