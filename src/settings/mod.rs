//! Per-game settings
//!
//! Value mapping, the override file codec, layer merging over the global
//! defaults, and the store that persists overrides.

pub mod codec;
pub mod defaults;
pub mod record;
mod store;
pub mod values;

pub use defaults::{GlobalDefaults, PreferenceDefaults};
pub use record::{EngineSettings, OverrideLayer, OverrideRecord, SettingsSink, merge};
pub use store::SettingsStore;
pub use values::{AspectRatio, BlendingAccuracy, Renderer, UpscaleMultiplier};
