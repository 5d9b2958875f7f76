//! Integration tests for pocketbook-core services
//!
//! These drive the services against the real file-backed stores in a
//! temporary directory.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tempfile::TempDir;

use pocketbook_core::adapters::duckdb::DuckDbStore;
use pocketbook_core::adapters::json_file::JsonFileStore;
use pocketbook_core::config::{Config, StorageBackend};
use pocketbook_core::domain::{
    Category, ReminderDraft, TransactionDraft, TransactionKind, UtilizationLevel,
};
use pocketbook_core::ports::{keys, KeyValueStore};
use pocketbook_core::services::{
    AuthService, DemoService, DiscardHook, PreferencesService, Session, WorkspaceService,
};
use pocketbook_core::{PocketbookContext, Theme};

// ============================================================================
// Test Helpers
// ============================================================================

fn json_store(dir: &Path) -> Arc<dyn KeyValueStore> {
    Arc::new(JsonFileStore::new(&dir.join("pocketbook.json")).expect("Failed to open store"))
}

fn duckdb_store(dir: &Path) -> Arc<dyn KeyValueStore> {
    Arc::new(DuckDbStore::new(&dir.join("pocketbook.duckdb")).expect("Failed to open store"))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(kind: TransactionKind, amount: i64, category: Category) -> TransactionDraft {
    TransactionDraft::new(kind, Decimal::from(amount), category, "", date(2024, 1, 10))
}

/// Registration, ledger mutations and reopen, against any store
fn exercise_full_flow(open: fn(&Path) -> Arc<dyn KeyValueStore>) {
    let temp_dir = TempDir::new().unwrap();

    let user_id = {
        let store = open(temp_dir.path());
        let auth = AuthService::new(Arc::clone(&store));
        let workspaces = WorkspaceService::new(store);

        let mut session = Session::anonymous();
        assert!(auth.register(&mut session, "Ana", "ana@x.com", "senha1").unwrap());
        let user_id = session.user().unwrap().id;

        workspaces
            .update(user_id, |ws| {
                ws.add_transaction(draft(TransactionKind::Income, 100, Category::Salary))?;
                ws.add_transaction(draft(TransactionKind::Expense, 40, Category::Food))?;
                ws.upsert_budget(Category::Food, Decimal::from(800))
            })
            .unwrap();
        user_id
    };

    // Reopen: a fresh process sees the same session and ledger
    let store = open(temp_dir.path());
    let auth = AuthService::new(Arc::clone(&store));
    let session = auth.restore_session().unwrap();
    assert_eq!(session.user().unwrap().id, user_id);

    let ws = WorkspaceService::new(store).load(user_id).unwrap();
    assert_eq!(ws.total_income(), Decimal::from(100));
    assert_eq!(ws.total_expense(), Decimal::from(40));
    assert_eq!(ws.balance(), Decimal::from(60));

    let food = ws.budget(Category::Food).unwrap();
    assert_eq!(food.spent, Decimal::from(40));
    assert_eq!(food.utilization_percent(), Some(Decimal::from(5)));
    assert_eq!(food.level(), UtilizationLevel::Healthy);
}

// ============================================================================
// Store backends
// ============================================================================

#[test]
fn test_full_flow_on_json_store() {
    exercise_full_flow(json_store);
}

#[test]
fn test_full_flow_on_duckdb_store() {
    exercise_full_flow(duckdb_store);
}

#[test]
fn test_duckdb_schema_is_applied_once() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pocketbook.duckdb");

    {
        let store = DuckDbStore::new(&path).unwrap();
        store.set("theme", "dark").unwrap();
    }

    let store = DuckDbStore::new(&path).unwrap();
    let result = store.ensure_schema().unwrap();
    assert!(result.applied.is_empty());
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

// ============================================================================
// Auth
// ============================================================================

#[test]
fn test_user_set_round_trips_through_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = Session::anonymous();
    {
        let auth = AuthService::new(json_store(temp_dir.path()));
        auth.register(&mut session, "Ana", "ana@x.com", "senha1").unwrap();
        auth.register(&mut session, "Bob", "bob@x.com", "hunter2").unwrap();
    }

    let auth = AuthService::new(json_store(temp_dir.path()));
    let users = auth.users().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Ana");
    assert_eq!(users[0].password, "senha1");
    assert_eq!(users[1].email, "bob@x.com");

    // Last registration owns the session
    assert_eq!(auth.restore_session().unwrap(), session);
    assert_eq!(session.user().unwrap().email, "bob@x.com");
}

#[test]
fn test_corrupt_file_entries_are_discarded() {
    let temp_dir = TempDir::new().unwrap();
    let store = json_store(temp_dir.path());
    store.set(keys::CURRENT_USER, "{broken").unwrap();
    store.set(keys::USERS, "{\"not\": \"a list\"}").unwrap();

    let auth = AuthService::new(Arc::clone(&store));
    assert!(!auth.restore_session().unwrap().is_authenticated());
    assert!(auth.users().unwrap().is_empty());
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_unparseable_store_file_does_not_lock_users_out() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pocketbook.json");
    std::fs::write(&path, r#"{"users": "[]", trunc"#).unwrap();

    let auth = AuthService::new(json_store(temp_dir.path()));
    assert!(!auth.restore_session().unwrap().is_authenticated());
    assert!(auth.users().unwrap().is_empty());

    let mut session = Session::anonymous();
    assert!(auth.register(&mut session, "Ana", "ana@x.com", "senha1").unwrap());
    assert!(auth.login(&mut Session::anonymous(), "ana@x.com", "senha1").unwrap());
    assert!(temp_dir.path().join("pocketbook.json.corrupt").exists());
}

#[test]
fn test_context_reports_discarded_entries() {
    let temp_dir = TempDir::new().unwrap();
    let user = uuid::Uuid::new_v4();
    {
        let store = json_store(temp_dir.path());
        store.set(keys::CURRENT_USER, "{broken").unwrap();
        store.set(&keys::workspace(user), "[1, 2").unwrap();
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let hook: DiscardHook = {
        let seen = Arc::clone(&seen);
        Arc::new(move |key: &str| seen.lock().unwrap().push(key.to_string()))
    };
    let ctx = PocketbookContext::with_discard_hook(temp_dir.path(), hook).unwrap();

    assert!(!ctx.session().unwrap().is_authenticated());
    assert_eq!(ctx.workspace_service.load(user).unwrap().transactions().len(), 0);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![keys::CURRENT_USER.to_string(), keys::workspace(user)]
    );

    // Already removed: a second read discards nothing
    ctx.session().unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);
}

// ============================================================================
// Ledger invariants
// ============================================================================

#[test]
fn test_budget_spent_tracks_every_mutation() {
    let temp_dir = TempDir::new().unwrap();
    let workspaces = WorkspaceService::new(json_store(temp_dir.path()));
    let user = uuid::Uuid::new_v4();

    workspaces
        .update(user, |ws| ws.upsert_budget(Category::Leisure, Decimal::from(100)))
        .unwrap();

    let cinema = workspaces
        .update(user, |ws| {
            ws.add_transaction(draft(TransactionKind::Expense, 75, Category::Leisure))
        })
        .unwrap();
    let ws = workspaces.load(user).unwrap();
    assert_eq!(ws.budget(Category::Leisure).unwrap().level(), UtilizationLevel::Warning);

    workspaces
        .update(user, |ws| {
            ws.update_transaction(cinema, draft(TransactionKind::Expense, 95, Category::Leisure))
        })
        .unwrap();
    let ws = workspaces.load(user).unwrap();
    assert_eq!(ws.budget(Category::Leisure).unwrap().level(), UtilizationLevel::Critical);

    workspaces
        .update(user, |ws| Ok(ws.delete_transaction(cinema)))
        .unwrap();
    let ws = workspaces.load(user).unwrap();
    assert_eq!(ws.budget(Category::Leisure).unwrap().spent, Decimal::ZERO);
    assert_eq!(ws.balance(), ws.total_income() - ws.total_expense());
}

#[test]
fn test_reminder_overdue_boundaries() {
    let temp_dir = TempDir::new().unwrap();
    let workspaces = WorkspaceService::new(json_store(temp_dir.path()));
    let user = uuid::Uuid::new_v4();
    let today = date(2024, 3, 15);

    workspaces
        .update(user, |ws| {
            for (name, due) in [
                ("Yesterday", today - Duration::days(1)),
                ("Today", today),
                ("Tomorrow", today + Duration::days(1)),
            ] {
                ws.add_reminder(ReminderDraft {
                    description: name.to_string(),
                    amount: Decimal::from(10),
                    due_date: due,
                    recurring: false,
                })?;
            }
            Ok(())
        })
        .unwrap();

    let ws = workspaces.load(user).unwrap();
    let overdue: Vec<_> = ws
        .reminders()
        .iter()
        .filter(|r| r.is_overdue_on(today))
        .map(|r| r.description.as_str())
        .collect();
    assert_eq!(overdue, vec!["Yesterday"]);
}

// ============================================================================
// Context, preferences and demo mode
// ============================================================================

#[test]
fn test_context_uses_configured_backend() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        demo_mode: false,
        storage: StorageBackend::DuckDb,
        trend_rules: None,
    };
    config.save(temp_dir.path()).unwrap();

    let ctx = PocketbookContext::new(temp_dir.path()).unwrap();
    ctx.preferences_service.set_theme(Theme::Dark).unwrap();

    assert_eq!(ctx.config.storage, StorageBackend::DuckDb);
    assert!(temp_dir.path().join("pocketbook.duckdb").exists());
    assert!(!temp_dir.path().join("pocketbook.json").exists());
    assert_eq!(ctx.preferences_service.theme().unwrap(), Theme::Dark);
}

#[test]
fn test_theme_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    PreferencesService::new(json_store(temp_dir.path()))
        .toggle_theme()
        .unwrap();

    let prefs = PreferencesService::new(json_store(temp_dir.path()));
    assert_eq!(prefs.theme().unwrap(), Theme::Dark);
}

#[test]
fn test_demo_mode_is_isolated_from_real_data() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    {
        let ctx = PocketbookContext::new(dir).unwrap();
        let mut session = Session::anonymous();
        ctx.auth_service
            .register(&mut session, "Ana", "ana@x.com", "senha1")
            .unwrap();
    }

    let demo = DemoService::new(dir);
    demo.enable(date(2024, 2, 5)).unwrap();
    {
        let ctx = PocketbookContext::new(dir).unwrap();
        let session = ctx.session().unwrap();
        let user = session.user().unwrap();
        assert_eq!(user.name, "Demo User");
        let report = ctx
            .report_service
            .build(&ctx.workspace_service.load(user.id).unwrap(), date(2024, 2, 5));
        assert_eq!(report.summary.transaction_count, 5);
    }

    demo.disable(true).unwrap();
    let ctx = PocketbookContext::new(dir).unwrap();
    let session = ctx.session().unwrap();
    assert_eq!(session.user().unwrap().email, "ana@x.com");
    assert_eq!(ctx.auth_service.users().unwrap().len(), 1);
}
