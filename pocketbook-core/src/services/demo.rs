//! Demo service - manage demo mode
//!
//! Demo mode points the context at a separate store (demo.json or
//! demo.duckdb) seeded with a logged-in demo user and sample data, so the
//! real store is never touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::auth::{AuthService, Session};
use super::workspace::WorkspaceService;
use crate::adapters::demo::{
    generate_demo_workspace, DEMO_USER_EMAIL, DEMO_USER_NAME, DEMO_USER_PASSWORD,
};
use crate::config::Config;

/// Every file a demo store can leave behind, across both backends
const DEMO_FILES: &[&str] = &[
    "demo.json",
    "demo.json.lock",
    "demo.json.tmp",
    "demo.json.corrupt",
    "demo.duckdb",
    "demo.duckdb.wal",
];

pub struct DemoService {
    data_dir: PathBuf,
}

impl DemoService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.data_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// 1. Delete any existing demo store (fresh start)
    /// 2. Enable demo mode in config
    /// 3. Register the demo user, which also logs it in
    /// 4. Save the sample workspace for that user
    pub fn enable(&self, today: NaiveDate) -> Result<()> {
        self.remove_demo_files()?;

        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.data_dir)?;

        let store = crate::open_store(&config, &self.data_dir)?;
        let auth = AuthService::new(Arc::clone(&store));
        let mut session = Session::anonymous();
        if !auth.register(&mut session, DEMO_USER_NAME, DEMO_USER_EMAIL, DEMO_USER_PASSWORD)? {
            auth.login(&mut session, DEMO_USER_EMAIL, DEMO_USER_PASSWORD)?;
        }
        let user = session
            .user()
            .context("Demo user could not be logged in")?;

        let workspace = generate_demo_workspace(today)?;
        WorkspaceService::new(store).save(user.id, &workspace)?;

        Ok(())
    }

    /// Disable demo mode, deleting the demo store when `clean` is set
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.data_dir)?;

        if clean {
            self.remove_demo_files()?;
        }

        Ok(())
    }

    fn remove_demo_files(&self) -> Result<()> {
        for name in DEMO_FILES {
            let path = self.data_dir.join(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }
}
