//! Log database migrations - embedded SQL files
//!
//! Same layout as the store migrations; applied to logs.duckdb by the
//! logging service through `MigrationService`.

/// All log migrations, embedded at compile time.
/// Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
