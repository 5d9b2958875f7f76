//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "demoMode": false, "storage": "json" },
//!   "trends": { "rules": [ ... ] }
//! }
//! ```
//! Keys this crate does not manage are kept as-is when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{default_trend_rules, TrendRule};

pub const SETTINGS_FILENAME: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    trends: TrendSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default)]
    storage: StorageBackend,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rules: Option<Vec<TrendRule>>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Which `KeyValueStore` adapter backs the data directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    DuckDb,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Json => "json",
            StorageBackend::DuckDb => "duckdb",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(StorageBackend::Json),
            "duckdb" => Some(StorageBackend::DuckDb),
            _ => None,
        }
    }
}

/// Interpret a boolean environment flag; `None` leaves the file value alone
fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

/// Pocketbook configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    pub storage: StorageBackend,
    /// `None` means the built-in trend rules apply
    pub trend_rules: Option<Vec<TrendRule>>,
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unparseable settings file yields defaults. Demo mode and
    /// the storage backend can be overridden with `POCKETBOOK_DEMO_MODE` and
    /// `POCKETBOOK_STORAGE` (for CI/testing).
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let mut config = Self::from_settings(&raw);

        if let Some(demo) = parse_flag(std::env::var("POCKETBOOK_DEMO_MODE").ok().as_deref()) {
            config.demo_mode = demo;
        }
        if let Some(storage) = std::env::var("POCKETBOOK_STORAGE")
            .ok()
            .as_deref()
            .and_then(StorageBackend::parse)
        {
            config.storage = storage;
        }

        Ok(config)
    }

    fn from_settings(raw: &SettingsFile) -> Self {
        Self {
            demo_mode: raw.app.demo_mode,
            storage: raw.app.storage,
            trend_rules: raw.trends.rules.clone(),
        }
    }

    /// Save config to the data directory, preserving unmanaged settings
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.app.demo_mode = self.demo_mode;
        settings.app.storage = self.storage;
        settings.trends.rules = self.trend_rules.clone();

        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(settings_path(data_dir), content)?;
        Ok(())
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }

    /// File name of the active store inside the data directory
    pub fn store_filename(&self) -> &'static str {
        match (self.storage, self.demo_mode) {
            (StorageBackend::Json, false) => "pocketbook.json",
            (StorageBackend::Json, true) => "demo.json",
            (StorageBackend::DuckDb, false) => "pocketbook.duckdb",
            (StorageBackend::DuckDb, true) => "demo.duckdb",
        }
    }

    pub fn store_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.store_filename())
    }

    /// Configured trend rules, or the built-in ones
    pub fn trend_rules(&self) -> Vec<TrendRule> {
        self.trend_rules.clone().unwrap_or_else(default_trend_rules)
    }
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILENAME)
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let path = settings_path(data_dir);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        let config = Config::from_settings(&raw);

        assert!(!config.demo_mode);
        assert_eq!(config.storage, StorageBackend::Json);
        assert_eq!(config.store_filename(), "pocketbook.json");
        assert_eq!(config.trend_rules(), default_trend_rules());
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), "{{{").unwrap();

        let config = Config::from_settings(&read_settings(dir.path()).unwrap());
        assert_eq!(config.storage, StorageBackend::Json);
    }

    #[test]
    fn test_save_preserves_unknown_settings() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"app": {"demoMode": false, "locale": "pt-BR"}, "window": {"width": 800}}"#,
        )
        .unwrap();

        let mut config = Config::from_settings(&read_settings(dir.path()).unwrap());
        config.enable_demo_mode();
        config.storage = StorageBackend::DuckDb;
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILENAME)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["app"]["demoMode"], true);
        assert_eq!(doc["app"]["storage"], "duckdb");
        assert_eq!(doc["app"]["locale"], "pt-BR");
        assert_eq!(doc["window"]["width"], 800);

        let reloaded = Config::from_settings(&read_settings(dir.path()).unwrap());
        assert_eq!(reloaded.store_filename(), "demo.duckdb");
    }

    #[test]
    fn test_trend_rules_override() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"trends": {"rules": [{"category": "transporte", "threshold": "200",
                "savingsRate": "0.1", "message": "Try public transit"}]}}"#,
        )
        .unwrap();

        let config = Config::from_settings(&read_settings(dir.path()).unwrap());
        let rules = config.trend_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].category, Category::Transport);
        assert_eq!(rules[0].threshold, Decimal::from(200));
    }

    #[test]
    fn test_env_flag_parsing() {
        assert_eq!(parse_flag(Some("1")), Some(true));
        assert_eq!(parse_flag(Some("no")), Some(false));
        assert_eq!(parse_flag(Some("maybe")), None);
        assert_eq!(parse_flag(None), None);
        assert_eq!(StorageBackend::parse(" DuckDB "), Some(StorageBackend::DuckDb));
        assert_eq!(StorageBackend::parse("sqlite"), None);
    }
}
