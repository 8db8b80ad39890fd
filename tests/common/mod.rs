#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use psx2_store::config::AppConfig;
use psx2_store::prefs::Preferences;
use psx2_store::settings::{PreferenceDefaults, SettingsStore};
use psx2_store::storage::{PersistedGrants, StorageBackend};
use psx2_store::{AssetImporter, ReadinessTracker};

/// Everything a scenario needs, rooted in temp directories
pub struct Harness {
    pub primary: tempfile::TempDir,
    pub mirror: tempfile::TempDir,
    pub config: AppConfig,
    pub prefs: Arc<Preferences>,
    pub grants: Arc<PersistedGrants>,
    pub backend: Arc<StorageBackend>,
    pub defaults: Arc<PreferenceDefaults>,
    pub settings: SettingsStore,
    pub importer: AssetImporter,
    pub readiness: ReadinessTracker,
}

impl Harness {
    pub fn new() -> Self {
        let primary = tempfile::tempdir().unwrap();
        let mirror = tempfile::tempdir().unwrap();
        let config = AppConfig::with_root(primary.path());
        let prefs = Arc::new(Preferences::in_memory());
        let grants = Arc::new(PersistedGrants::new());
        let backend = Arc::new(StorageBackend::new(&config, prefs.clone(), grants.clone()));
        let defaults = Arc::new(PreferenceDefaults::new(prefs.clone()));
        let settings = SettingsStore::new(backend.clone(), defaults.clone());
        let importer = AssetImporter::new(backend.clone());
        let readiness = ReadinessTracker::new(backend.clone(), config.firmware_min_size_bytes());
        Self {
            primary,
            mirror,
            config,
            prefs,
            grants,
            backend,
            defaults,
            settings,
            importer,
            readiness,
        }
    }

    /// Grant the mirror directory and record it as the data root
    pub fn grant_mirror(&self) -> String {
        let token = self.grants.grant(self.mirror.path());
        self.backend.set_mirror_grant(&token);
        token
    }

    pub fn primary_path(&self, rel: &str) -> std::path::PathBuf {
        self.primary.path().join(rel)
    }

    pub fn mirror_path(&self, rel: &str) -> std::path::PathBuf {
        self.mirror.path().join(rel)
    }
}

/// Encode a solid-colour PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}
