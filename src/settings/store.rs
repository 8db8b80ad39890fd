use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::entity::EntityId;
use crate::error::StoreError;
use crate::settings::codec;
use crate::settings::defaults::GlobalDefaults;
use crate::settings::record::{EngineSettings, OverrideLayer, OverrideRecord, SettingsSink, merge};
use crate::storage::{DEFAULT_CONTENT_TYPE, DirectoryPath, StorageBackend, StorageRoot, settle};

const SETTINGS_DIR: &str = "gamesettings";
const SETTINGS_EXT: &str = "ini";

/// Per-game overrides over the global baseline.
///
/// The primary root is authoritative for resolution. Saves are mirrored on a
/// best-effort basis; deletes only touch the primary copy.
pub struct SettingsStore {
    backend: Arc<StorageBackend>,
    defaults: Arc<dyn GlobalDefaults>,
}

impl SettingsStore {
    pub fn new(backend: Arc<StorageBackend>, defaults: Arc<dyn GlobalDefaults>) -> Self {
        Self { backend, defaults }
    }

    fn dir() -> DirectoryPath {
        DirectoryPath::new([SETTINGS_DIR])
    }

    fn file_name(key: &str) -> String {
        format!("{key}.{SETTINGS_EXT}")
    }

    /// Fields stored for `entity`; empty if there is no override file.
    pub fn load_layer(&self, entity: &EntityId) -> OverrideLayer {
        let Some(key) = entity.key() else {
            return OverrideLayer::default();
        };
        let Some(file) =
            self.backend
                .find_file(StorageRoot::Primary, &Self::dir(), &Self::file_name(key))
        else {
            return OverrideLayer::default();
        };
        match self.backend.read_all(&file) {
            Some(bytes) => codec::decode(&String::from_utf8_lossy(&bytes)),
            None => OverrideLayer::default(),
        }
    }

    pub fn has_override(&self, entity: &EntityId) -> bool {
        entity.key().is_some_and(|key| {
            self.backend
                .find_file(StorageRoot::Primary, &Self::dir(), &Self::file_name(key))
                .is_some()
        })
    }

    /// Effective settings: stored fields over the defaults as of now
    pub fn resolve(&self, entity: &EntityId) -> OverrideRecord {
        let layer = self.load_layer(entity);
        let resolved = merge(&layer, &self.defaults.snapshot());
        debug!(
            "Resolved settings for {}: {:?}",
            entity.key().unwrap_or("<unknown>"),
            resolved
        );
        resolved
    }

    /// Overwrite the whole override file, then mirror it. True if the
    /// primary write succeeded.
    pub fn save(&self, entity: &EntityId, record: &OverrideRecord) -> bool {
        let Some(key) = entity.key() else {
            warn!("No game serial or checksum available, cannot save settings");
            return false;
        };
        let file_name = Self::file_name(key);
        let body = codec::encode(record);

        let primary = self
            .backend
            .prepare_file(StorageRoot::Primary, &Self::dir(), &file_name, DEFAULT_CONTENT_TYPE)
            .filter(|file| self.backend.write_all(file, body.as_bytes()))
            .map(|_| ())
            .ok_or_else(|| StoreError::WriteFailed(format!("{SETTINGS_DIR}/{file_name}")));

        if let Err(e) = &primary {
            error!("Failed to save settings for {}: {}", key, e);
        }

        let mirror = self.backend.mirror_bytes(
            &Self::dir(),
            &file_name,
            DEFAULT_CONTENT_TYPE,
            body.as_bytes(),
        );

        let saved = settle(key, primary, mirror).is_ok();
        if saved {
            info!("Game settings saved: {}", file_name);
        }
        saved
    }

    /// Remove the primary override so the defaults apply again. True if a
    /// file was removed.
    pub fn delete(&self, entity: &EntityId) -> bool {
        let Some(key) = entity.key() else {
            warn!("No game serial or checksum available, cannot reset settings");
            return false;
        };
        match self
            .backend
            .find_file(StorageRoot::Primary, &Self::dir(), &Self::file_name(key))
        {
            Some(file) => self.backend.delete_file(&file),
            None => {
                debug!("No settings override to delete for {}", key);
                false
            }
        }
    }

    /// Resolve and hand the result to the emulation core
    pub fn apply(&self, entity: &EntityId, sink: &dyn SettingsSink) -> OverrideRecord {
        let resolved = self.resolve(entity);
        sink.apply(&EngineSettings::from(&resolved));
        resolved
    }
}
