use log::debug;
use std::fmt;
use std::sync::Arc;

use crate::prefs::keys;
use crate::readiness::firmware::is_firmware_file;
use crate::storage::{DirectoryPath, StorageBackend, StorageRoot};

const FIRMWARE_DIR: &str = "bios";

/// Named onboarding prerequisite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadinessStep {
    /// A usable data folder has been granted
    DataLocation,
    /// The games library folder has been chosen
    AssetLibrary,
    /// Console firmware is present in the primary root
    Firmware,
}

impl ReadinessStep {
    pub const ORDER: [ReadinessStep; 3] = [
        ReadinessStep::DataLocation,
        ReadinessStep::AssetLibrary,
        ReadinessStep::Firmware,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReadinessStep::DataLocation => "Data folder",
            ReadinessStep::AssetLibrary => "Games library",
            ReadinessStep::Firmware => "BIOS files",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ReadinessStep::DataLocation => {
                "Pick a writable data folder for saves, states, and config."
            }
            ReadinessStep::AssetLibrary => {
                "Point to your games folder so covers and sorting work."
            }
            ReadinessStep::Firmware => "Import your console BIOS so games can boot.",
        }
    }
}

impl fmt::Display for ReadinessStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One evaluated step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    pub step: ReadinessStep,
    pub complete: bool,
}

/// Stateless evaluator over current storage and preferences
pub struct ReadinessTracker {
    backend: Arc<StorageBackend>,
    min_dump_size: u64,
}

impl ReadinessTracker {
    pub fn new(backend: Arc<StorageBackend>, min_dump_size: u64) -> Self {
        Self {
            backend,
            min_dump_size,
        }
    }

    /// Record the games library location
    pub fn set_games_folder(&self, location: &str) {
        self.backend
            .preferences()
            .set_string(keys::GAMES_FOLDER, location);
    }

    pub fn is_complete(&self, step: ReadinessStep) -> bool {
        let complete = match step {
            ReadinessStep::DataLocation => self.backend.has_mirror_root(),
            ReadinessStep::AssetLibrary => self
                .backend
                .preferences()
                .get_string(keys::GAMES_FOLDER)
                .is_some(),
            ReadinessStep::Firmware => self.firmware_present(),
        };
        debug!("Readiness step {:?}: {}", step, complete);
        complete
    }

    /// Stops at the first matching file
    fn firmware_present(&self) -> bool {
        self.backend.any_file(
            StorageRoot::Primary,
            &DirectoryPath::new([FIRMWARE_DIR]),
            |name, size| is_firmware_file(name, size, self.min_dump_size),
        )
    }

    /// Every step in order with its current state
    pub fn evaluate(&self) -> Vec<StepStatus> {
        ReadinessStep::ORDER
            .into_iter()
            .map(|step| StepStatus {
                step,
                complete: self.is_complete(step),
            })
            .collect()
    }

    pub fn first_incomplete(&self) -> Option<ReadinessStep> {
        ReadinessStep::ORDER
            .into_iter()
            .find(|step| !self.is_complete(*step))
    }

    pub fn all_complete(&self) -> bool {
        self.first_incomplete().is_none()
    }
}
