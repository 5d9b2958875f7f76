//! Schema migrations for the DuckDB files
//!
//! The store database and the log database each embed an ordered list of
//! `(name, sql)` pairs. The first pair creates `sys_migrations`; every pair
//! runs at most once, in the same transaction as the row that records it.

use anyhow::{Context, Result};
use duckdb::Connection;

/// An embedded, ordered list of `(file name, sql)` migrations
pub type MigrationSet = &'static [(&'static str, &'static str)];

/// Outcome of `MigrationService::run_pending`
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MigrationResult {
    /// Names applied by this run, in order
    pub applied: Vec<String>,
    /// Migrations found already recorded
    pub already_applied: usize,
}

/// Applies one migration set to one connection
pub struct MigrationService<'a> {
    conn: &'a Connection,
    set: MigrationSet,
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection, set: MigrationSet) -> Self {
        Self { conn, set }
    }

    /// Apply every migration of the set not yet recorded, in set order
    pub fn run_pending(&self) -> Result<MigrationResult> {
        let recorded = self.get_applied()?;
        let mut result = MigrationResult::default();

        for (name, sql) in self.set {
            if recorded.iter().any(|r| r == name) {
                result.already_applied += 1;
                continue;
            }
            self.apply(name, sql)
                .with_context(|| format!("Migration {} failed", name))?;
            result.applied.push(name.to_string());
        }

        Ok(result)
    }

    /// Run `sql` and record `name`, both or neither
    fn apply(&self, name: &str, sql: &str) -> Result<()> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        let outcome = self.conn.execute_batch(sql).and_then(|_| {
            self.conn
                .execute("INSERT INTO sys_migrations (migration_name) VALUES (?)", [name])
                .map(|_| ())
        });

        match outcome {
            Ok(()) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(())
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e.into())
            }
        }
    }

    fn has_tracking_table(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Recorded migration names; empty before the first run
    pub fn get_applied(&self) -> Result<Vec<String>> {
        if !self.has_tracking_table()? {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Names of the set not yet recorded, in set order
    pub fn get_pending(&self) -> Result<Vec<String>> {
        let recorded = self.get_applied()?;
        Ok(self
            .set
            .iter()
            .map(|(name, _)| name.to_string())
            .filter(|name| !recorded.contains(name))
            .collect())
    }
}
