//! Logging service - structured event logging to DuckDB
//!
//! Events go to logs.duckdb next to the data store. Nothing a user typed is
//! ever recorded: no emails, passwords, amounts, names or descriptions.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use duckdb::types::Value;
use duckdb::Connection;
use serde::{Deserialize, Serialize};

use super::migration::MigrationService;
use crate::log_migrations::LOG_MIGRATIONS;

/// File name of the log database inside the data directory
pub const LOG_DB_FILENAME: &str = "logs.duckdb";

const SELECT_COLUMNS: &str = "SELECT id, timestamp, entry_point, app_version, platform, \
     event, command, error_message, error_details FROM sys_logs";

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Unique ID: timestamp in the upper bits, a wrapping counter in the lower 16
fn generate_id() -> u64 {
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    ((epoch_ms() as u64) << 16) | counter
}

/// Current unix timestamp in milliseconds
pub fn now_ms() -> i64 {
    epoch_ms() as i64
}

fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Which front end produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Library,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Library => "library",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            command: None,
            error_message: None,
            error_details: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A log entry as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub command: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

impl LogEntry {
    fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            entry_point: row.get(2)?,
            app_version: row.get(3)?,
            platform: row.get(4)?,
            event: row.get(5)?,
            command: row.get(6)?,
            error_message: row.get(7)?,
            error_details: row.get(8)?,
        })
    }
}

/// Which entries `LoggingService::find` returns
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Exact event name
    pub event: Option<String>,
    /// Command name; also matches its subcommands
    pub command: Option<String>,
    pub errors_only: bool,
    pub limit: usize,
}

impl LogFilter {
    pub fn recent(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// How often one event (or failing command) was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCount {
    pub name: String,
    pub count: u64,
    pub last_seen: i64,
}

/// Service for structured event logging
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Open or create logs.duckdb in `data_dir` and run pending migrations
    pub fn new(
        data_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        let db_path = data_dir.join(LOG_DB_FILENAME);
        let conn = Connection::open(&db_path)?;
        MigrationService::new(&conn, LOG_MIGRATIONS).run_pending()?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        })
    }

    /// Record an event; entry point, version and platform are filled in
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO sys_logs (
                id, timestamp, entry_point, app_version, platform,
                event, command, error_message, error_details
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            duckdb::params![
                generate_id(),
                now_ms(),
                self.entry_point.as_str(),
                &self.app_version,
                self.platform,
                &event.event,
                &event.command,
                &event.error_message,
                &event.error_details,
            ],
        )?;

        Ok(())
    }

    pub fn log_event(&self, event: &str) -> Result<()> {
        self.log(LogEvent::new(event))
    }

    /// Log a CLI command execution
    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    /// Most recent entries first
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.find(&LogFilter::recent(limit))
    }

    /// Most recent entries that carry an error message
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.find(&LogFilter {
            errors_only: true,
            ..LogFilter::recent(limit)
        })
    }

    /// Entries matching `filter`, newest first
    pub fn find(&self, filter: &LogFilter) -> Result<Vec<LogEntry>> {
        let mut clauses = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(event) = &filter.event {
            clauses.push("event = ?");
            params.push(Value::Text(event.clone()));
        }
        if let Some(command) = &filter.command {
            // "tx" matches "tx" and "tx add" but not "txt"
            clauses.push("(command = ? OR starts_with(command, ?))");
            params.push(Value::Text(command.clone()));
            params.push(Value::Text(format!("{} ", command)));
        }
        if filter.errors_only {
            clauses.push("error_message IS NOT NULL");
        }
        params.push(Value::BigInt(filter.limit as i64));

        let mut sql = SELECT_COLUMNS.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY timestamp DESC, id DESC LIMIT ?");

        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(duckdb::params_from_iter(params.iter()), LogEntry::from_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    /// Number of entries per event name, most frequent first
    pub fn event_counts(&self) -> Result<Vec<EventCount>> {
        self.grouped_counts(
            "SELECT event, COUNT(*), MAX(timestamp) FROM sys_logs \
             GROUP BY event ORDER BY 2 DESC, 1",
        )
    }

    /// Number of `command_failed` entries per command, most frequent first
    pub fn failed_command_counts(&self) -> Result<Vec<EventCount>> {
        self.grouped_counts(
            "SELECT COALESCE(command, 'unknown'), COUNT(*), MAX(timestamp) FROM sys_logs \
             WHERE event = 'command_failed' GROUP BY 1 ORDER BY 2 DESC, 1",
        )
    }

    fn grouped_counts(&self, sql: &str) -> Result<Vec<EventCount>> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let mut stmt = conn.prepare(sql)?;
        let counts = stmt
            .query_map([], |row| {
                Ok(EventCount {
                    name: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                    last_seen: row.get(2)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(counts)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM sys_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete logs older than the given unix-ms timestamp
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let deleted = conn.execute("DELETE FROM sys_logs WHERE timestamp < ?", [timestamp_ms])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logging_service_creation() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        assert!(service.db_path().exists());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let dir = tempdir().unwrap();
        {
            let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();
            service.log_event("login_succeeded").unwrap();
        }
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_log_command() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Library, "2.0.0").unwrap();

        service.log_command("tx add").unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "command_executed");
        assert_eq!(entries[0].command.as_deref(), Some("tx add"));
        assert_eq!(entries[0].entry_point, "library");
        assert_eq!(entries[0].app_version, "2.0.0");
    }

    #[test]
    fn test_failed_command_is_listed_as_error() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log_event("command_executed").unwrap();
        service
            .log(
                LogEvent::new("command_failed")
                    .with_command("tx add")
                    .with_error("Amount must be greater than zero")
                    .with_error_details("validation"),
            )
            .unwrap();

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "command_failed");
        assert_eq!(
            errors[0].error_message.as_deref(),
            Some("Amount must be greater than zero")
        );
        assert_eq!(errors[0].command.as_deref(), Some("tx add"));
        assert_eq!(errors[0].error_details.as_deref(), Some("validation"));
    }

    #[test]
    fn test_find_by_command_includes_subcommands() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log_command("tx add").unwrap();
        service.log_command("tx rm").unwrap();
        service.log_command("theme").unwrap();
        service
            .log(LogEvent::new("command_failed").with_command("tx").with_error("Not logged in"))
            .unwrap();

        let filter = LogFilter {
            command: Some("tx".to_string()),
            ..LogFilter::recent(10)
        };
        assert_eq!(service.find(&filter).unwrap().len(), 3);

        let failed = LogFilter {
            command: Some("tx".to_string()),
            errors_only: true,
            ..LogFilter::recent(10)
        };
        let entries = service.find(&failed).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "command_failed");

        let by_event = LogFilter {
            event: Some("command_executed".to_string()),
            ..LogFilter::recent(1)
        };
        assert_eq!(service.find(&by_event).unwrap().len(), 1);
    }

    #[test]
    fn test_event_and_failure_counts() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log_event("login_failed").unwrap();
        service.log_event("login_failed").unwrap();
        service.log_event("login_succeeded").unwrap();
        for command in ["budget", "budget", "report"] {
            service
                .log(LogEvent::new("command_failed").with_command(command).with_error("boom"))
                .unwrap();
        }

        let events = service.event_counts().unwrap();
        assert_eq!(events[0].name, "command_failed");
        assert_eq!(events[0].count, 3);
        assert_eq!(events[1].name, "login_failed");
        assert_eq!(events[1].count, 2);

        let failed = service.failed_command_counts().unwrap();
        let pairs: Vec<(&str, u64)> = failed.iter().map(|c| (c.name.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("budget", 2), ("report", 1)]);
    }

    #[test]
    fn test_count_and_delete() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log_event("event1").unwrap();
        service.log_event("event2").unwrap();
        service.log_event("event3").unwrap();
        assert_eq!(service.count().unwrap(), 3);

        let deleted = service.delete_before(now_ms() + 1000).unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(service.count().unwrap(), 0);
    }
}
