use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::StoreError;

/// A single stored preference value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Thread-safe preference store with write-through persistence
#[derive(Debug)]
pub struct Preferences {
    path: Option<PathBuf>,
    values: RwLock<BTreeMap<String, PrefValue>>,
}

impl Preferences {
    /// Open the store backed by `path`. A missing file starts empty; a
    /// malformed one is logged and ignored.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, PrefValue>>(&bytes) {
                Ok(values) => values,
                Err(e) => {
                    warn!(
                        "Ignoring malformed preferences file {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::from(e)),
        };

        debug!(
            "Loaded {} preferences from {}",
            values.len(),
            path.display()
        );

        Ok(Self {
            path: Some(path),
            values: RwLock::new(values),
        })
    }

    /// Store that lives only for the lifetime of the process
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<PrefValue> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(PrefValue::Bool(b)) => b,
            _ => default,
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(PrefValue::Int(i)) => i,
            _ => default,
        }
    }

    /// Integers are widened so a multiplier stored as `4` reads back as `4.0`.
    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(PrefValue::Float(f)) => f,
            Some(PrefValue::Int(i)) => i as f64,
            _ => default,
        }
    }

    /// String value, with empty strings treated as absent
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(PrefValue::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn set_bool(&self, key: &str, value: bool) {
        self.set(key, PrefValue::Bool(value));
    }

    pub fn set_int(&self, key: &str, value: i64) {
        self.set(key, PrefValue::Int(value));
    }

    pub fn set_float(&self, key: &str, value: f64) {
        self.set(key, PrefValue::Float(value));
    }

    pub fn set_string(&self, key: &str, value: &str) {
        self.set(key, PrefValue::Text(value.to_string()));
    }

    pub fn set(&self, key: &str, value: PrefValue) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
        self.persist(&values);
    }

    pub fn remove(&self, key: &str) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }

    /// Write-through under the caller's write guard, so snapshots reach disk
    /// in the order they were taken. Failures are logged; the in-memory value
    /// stays authoritative.
    fn persist(&self, values: &BTreeMap<String, PrefValue>) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_json(path, values) {
            error!("Failed to persist preferences to {}: {}", path.display(), e);
        }
    }
}

fn write_json(path: &Path, values: &BTreeMap<String, PrefValue>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(values)?;
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, data)?;
    fs::rename(&temp, path)
}
