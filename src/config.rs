//! Configuration management for psx2-store
//!
//! Values come from built-in defaults, then an optional `config.toml`,
//! then `PSX2_STORE_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "config";
const ENV_PREFIX: &str = "PSX2_STORE";

/// Complete application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// App-private root holding settings, imported documents and firmware
    pub primary_root: String,

    /// JSON file backing the preference store
    pub preferences_file: String,

    /// Chunk size for streamed copies
    pub copy_buffer_size: usize,

    /// Size threshold for the generic firmware heuristic
    pub firmware_min_size_kib: u64,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from an explicit file (extension optional)
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("primary_root", "./psx2_data")?
            .set_default("preferences_file", "./psx2_data/app_prefs.json")?
            .set_default("copy_buffer_size", 8192_i64)?
            .set_default("firmware_min_size_kib", 256_i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration rooted at `root`, used by tests and embedders
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            preferences_file: root.join("app_prefs.json").to_string_lossy().to_string(),
            primary_root: root.to_string_lossy().to_string(),
            copy_buffer_size: 8192,
            firmware_min_size_kib: 256,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_root.trim().is_empty() {
            return Err(ConfigError::Message("primary_root cannot be empty".into()));
        }

        if self.preferences_file.trim().is_empty() {
            return Err(ConfigError::Message(
                "preferences_file cannot be empty".into(),
            ));
        }

        if self.copy_buffer_size == 0 {
            return Err(ConfigError::Message(
                "copy_buffer_size must be greater than 0".into(),
            ));
        }

        if self.firmware_min_size_kib == 0 {
            return Err(ConfigError::Message(
                "firmware_min_size_kib must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn primary_root_path(&self) -> PathBuf {
        PathBuf::from(&self.primary_root)
    }

    pub fn preferences_path(&self) -> PathBuf {
        PathBuf::from(&self.preferences_file)
    }

    /// Firmware threshold in bytes
    pub fn firmware_min_size_bytes(&self) -> u64 {
        self.firmware_min_size_kib * 1024
    }
}
