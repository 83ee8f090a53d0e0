//! Settings repository implementation

use crate::db::schema::SETTINGS;
use crate::db::LocalStore;
use crate::error::Result;
use crate::models::Settings;

const SETTINGS_KEY: &str = "app";

/// Typed access to the settings collection.
pub struct SettingsRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new repository over the given store
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Load settings, falling back to defaults when none are saved yet.
    pub async fn load(&self) -> Result<Settings> {
        Ok(self
            .store
            .get(SETTINGS, SETTINGS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Save settings.
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        self.store.put(SETTINGS, SETTINGS_KEY, settings).await
    }
}
