use std::sync::Arc;

use crate::assets::AssetImporter;
use crate::config::AppConfig;
use crate::error::StoreError;
use crate::prefs::Preferences;
use crate::readiness::ReadinessTracker;
use crate::settings::{PreferenceDefaults, SettingsStore};
use crate::storage::{DirectoryGrants, GrantProvider, StorageBackend};

/// Shared services a command runs against
pub struct AppContext {
    pub backend: Arc<StorageBackend>,
    pub defaults: Arc<PreferenceDefaults>,
    pub settings: SettingsStore,
    pub importer: AssetImporter,
    pub readiness: ReadinessTracker,
}

impl AppContext {
    /// Wire everything from configuration, with directory-path grants
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let prefs = Arc::new(Preferences::open(config.preferences_path())?);
        Ok(Self::with_services(config, prefs, Arc::new(DirectoryGrants)))
    }

    pub fn with_services(
        config: &AppConfig,
        prefs: Arc<Preferences>,
        grants: Arc<dyn GrantProvider>,
    ) -> Self {
        let backend = Arc::new(StorageBackend::new(config, prefs.clone(), grants));
        let defaults = Arc::new(PreferenceDefaults::new(prefs));
        Self {
            settings: SettingsStore::new(backend.clone(), defaults.clone()),
            defaults,
            importer: AssetImporter::new(backend.clone()),
            readiness: ReadinessTracker::new(backend.clone(), config.firmware_min_size_bytes()),
            backend,
        }
    }
}
