//! Pocketbook Core - Business logic for a personal finance tracker
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Transaction, Budget, Workspace, etc.)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration (auth, workspaces, reports)
//! - **adapters**: Concrete implementations (JSON file, DuckDB, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbStore;
use adapters::json_file::JsonFileStore;
use config::{Config, StorageBackend};
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    Budget, Category, SavingsGoal, PaymentReminder, Theme, Transaction, TransactionKind, User,
    Workspace,
};
pub use services::{EntryPoint, LogEntry, LogEvent, LoggingService, Session};

/// Open the store the config selects inside `data_dir`
pub fn open_store(config: &Config, data_dir: &Path) -> Result<Arc<dyn KeyValueStore>> {
    let path = config.store_path(data_dir);
    let store: Arc<dyn KeyValueStore> = match config.storage {
        StorageBackend::Json => Arc::new(
            JsonFileStore::new(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        StorageBackend::DuckDb => Arc::new(
            DuckDbStore::new(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
    };
    Ok(store)
}

/// Main context for Pocketbook operations
///
/// This is the primary entry point for all business logic. It holds
/// the configured store, the configuration, and all services.
pub struct PocketbookContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: Arc<dyn KeyValueStore>,
    pub auth_service: AuthService,
    pub workspace_service: WorkspaceService,
    pub preferences_service: PreferencesService,
    pub report_service: ReportService,
}

impl PocketbookContext {
    /// Create a context over the store configured for `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir, None)
    }

    /// Like `new`, reporting every unreadable entry the services discard
    pub fn with_discard_hook(data_dir: &Path, hook: DiscardHook) -> Result<Self> {
        Self::open(data_dir, Some(hook))
    }

    fn open(data_dir: &Path, on_discard: Option<DiscardHook>) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let store = open_store(&config, data_dir)?;

        let mut auth_service = AuthService::new(Arc::clone(&store));
        let mut workspace_service = WorkspaceService::new(Arc::clone(&store));
        if let Some(hook) = on_discard {
            auth_service = auth_service.with_discard_hook(Arc::clone(&hook));
            workspace_service = workspace_service.with_discard_hook(hook);
        }
        let preferences_service = PreferencesService::new(Arc::clone(&store));
        let report_service = ReportService::new(config.trend_rules());

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            store,
            auth_service,
            workspace_service,
            preferences_service,
            report_service,
        })
    }

    /// Session restored from the store's `currentUser` marker
    pub fn session(&self) -> Result<Session> {
        Ok(self.auth_service.restore_session()?)
    }
}
