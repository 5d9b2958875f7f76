//! CLI command implementations

pub mod auth;
pub mod budget;
pub mod demo;
pub mod goal;
pub mod logs;
pub mod reminder;
pub mod report;
pub mod status;
pub mod theme;
pub mod tx;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use dialoguer::Input;
use pocketbook_core::domain::SessionUser;
use pocketbook_core::{EntryPoint, LogEvent, LoggingService, PocketbookContext};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record a successful mutating command
pub fn log_command(command: &str) {
    if let Some(l) = get_logger() {
        let _ = l.log_command(command);
    }
}

/// Store key reduced to its entry kind; per-user keys lose the user id
fn discarded_entry_kind(key: &str) -> &str {
    key.split(':').next().unwrap_or(key)
}

fn log_discarded_entry(key: &str) {
    log_event(
        &get_logger(),
        LogEvent::new("corrupt_state_discarded")
            .with_error(format!("Unreadable '{}' entry discarded", discarded_entry_kind(key))),
    );
}

/// Get the data directory from `POCKETBOOK_DIR` or `~/.pocketbook`
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("POCKETBOOK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".pocketbook"))
        .ok_or_else(|| anyhow!("Could not find home directory; set POCKETBOOK_DIR"))
}

/// Get or create the pocketbook context
pub fn get_context() -> Result<PocketbookContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    PocketbookContext::with_discard_hook(&data_dir, Arc::new(log_discarded_entry))
        .context("Failed to initialize pocketbook context")
}

/// The logged-in user, or an error telling how to log in
pub fn require_user(ctx: &PocketbookContext) -> Result<SessionUser> {
    let session = ctx.session()?;
    match session.user() {
        Some(user) => Ok(user.clone()),
        None => bail!("Not logged in. Run 'pb login' or 'pb register' first."),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Use the given value or ask for it interactively
///
/// Without a terminal on stdin there is nobody to ask, so a missing value
/// is an error instead of a hung prompt.
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if atty::isnt(atty::Stream::Stdin) => bail!("Missing value: {}", prompt),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

pub fn parse_amount(s: &str) -> Result<Decimal> {
    s.trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse()
        .map_err(|_| anyhow!("Invalid amount; use a number like 12.50"))
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date format. Use YYYY-MM-DD"))
}

/// Resolve a full id or a unique prefix of one (as printed by list commands)
pub fn resolve_id(input: &str, ids: impl IntoIterator<Item = Uuid>) -> Result<Uuid> {
    let needle = input.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&needle) {
        return Ok(id);
    }
    if needle.is_empty() {
        bail!("No id given");
    }

    let matches: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No record matches id '{}'", input),
        _ => bail!("Id '{}' is ambiguous; use more characters", input),
    }
}
