//! Workspace service - per-user persistence of the ledger and managers

use std::sync::Arc;

use uuid::Uuid;

use super::persisted::{load_or_discard, save, DiscardHook};
use crate::domain::result::Result;
use crate::domain::Workspace;
use crate::ports::{keys, KeyValueStore};

/// Loads and saves one user's `Workspace` under `workspace:<user-id>`
pub struct WorkspaceService {
    store: Arc<dyn KeyValueStore>,
    on_discard: Option<DiscardHook>,
}

impl WorkspaceService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            on_discard: None,
        }
    }

    pub fn with_discard_hook(mut self, hook: DiscardHook) -> Self {
        self.on_discard = Some(hook);
        self
    }

    /// Load the user's workspace, empty if none (or unreadable) is stored
    ///
    /// Budget `spent` values are re-derived from the loaded ledger rather
    /// than trusted from storage.
    pub fn load(&self, user_id: Uuid) -> Result<Workspace> {
        let key = keys::workspace(user_id);
        let mut workspace: Workspace =
            load_or_discard(self.store.as_ref(), &key, self.on_discard.as_ref())?
                .unwrap_or_default();
        workspace.recompute_budgets();
        Ok(workspace)
    }

    pub fn save(&self, user_id: Uuid, workspace: &Workspace) -> Result<()> {
        save(self.store.as_ref(), &keys::workspace(user_id), workspace)
    }

    /// Load, apply `f`, and save only if `f` succeeds
    pub fn update<T>(
        &self,
        user_id: Uuid,
        f: impl FnOnce(&mut Workspace) -> Result<T>,
    ) -> Result<T> {
        let mut workspace = self.load(user_id)?;
        let value = f(&mut workspace)?;
        self.save(user_id, &workspace)?;
        Ok(value)
    }
}
