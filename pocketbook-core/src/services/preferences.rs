//! Preferences service - display theme

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::Theme;
use crate::ports::{keys, KeyValueStore};

pub struct PreferencesService {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored theme; light when unset or unrecognized
    ///
    /// The value is stored bare (`dark`), but a JSON-quoted value is
    /// accepted too.
    pub fn theme(&self) -> Result<Theme> {
        let theme: Theme = self
            .store
            .get(keys::THEME)?
            .and_then(|raw| raw.trim().trim_matches('"').parse().ok())
            .unwrap_or_default();
        Ok(theme)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(keys::THEME, theme.as_str())
    }

    /// Flip between dark and light, returning the new theme
    pub fn toggle_theme(&self) -> Result<Theme> {
        let next = self.theme()?.toggled();
        self.set_theme(next)?;
        Ok(next)
    }
}
