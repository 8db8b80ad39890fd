pub mod assets;
pub mod commands;
pub mod config;
pub mod entity;
pub mod error;
pub mod prefs;
pub mod readiness;
pub mod settings;
pub mod storage;

pub use assets::{AssetImporter, DocumentKind, ImportOutcome};
pub use config::AppConfig;
pub use entity::EntityId;
pub use error::StoreError;
pub use readiness::{ReadinessStep, ReadinessTracker};
pub use settings::{OverrideLayer, OverrideRecord, SettingsStore};
pub use storage::{StorageBackend, StorageRoot};
