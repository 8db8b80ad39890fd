//! Global defaults
//!
//! The shared baseline every override falls back to. It is owned by the
//! preferences collaborator; the settings store only reads snapshots.

use std::sync::Arc;

use crate::prefs::{Preferences, keys};
use crate::settings::record::OverrideRecord;
use crate::settings::values::{AspectRatio, BlendingAccuracy, Renderer, UpscaleMultiplier};

/// Source of the baseline option mapping
pub trait GlobalDefaults: Send + Sync {
    /// Current values, read at call time
    fn snapshot(&self) -> OverrideRecord;
}

/// A fixed baseline
impl GlobalDefaults for OverrideRecord {
    fn snapshot(&self) -> OverrideRecord {
        *self
    }
}

/// Defaults backed by the preference store
#[derive(Debug, Clone)]
pub struct PreferenceDefaults {
    prefs: Arc<Preferences>,
}

impl PreferenceDefaults {
    pub fn new(prefs: Arc<Preferences>) -> Self {
        Self { prefs }
    }

    /// Replace the baseline
    pub fn set(&self, record: &OverrideRecord) {
        self.prefs
            .set_int(keys::RENDERER, record.renderer.legacy_code() as i64);
        self.prefs
            .set_float(keys::UPSCALE_MULTIPLIER, record.upscale.value() as f64);
        self.prefs
            .set_int(keys::ASPECT_RATIO, record.aspect_ratio.index() as i64);
        self.prefs
            .set_int(keys::BLENDING_ACCURACY, record.blending.index() as i64);
        self.prefs
            .set_bool(keys::WIDESCREEN_PATCHES, record.widescreen_patches);
        self.prefs
            .set_bool(keys::NO_INTERLACING_PATCHES, record.no_interlacing_patches);
        self.prefs.set_bool(keys::ENABLE_PATCHES, record.enable_patches);
        self.prefs.set_bool(keys::ENABLE_CHEATS, record.enable_cheats);
    }
}

fn clamp_index(value: i64, max: usize) -> usize {
    value.clamp(0, max as i64) as usize
}

impl GlobalDefaults for PreferenceDefaults {
    fn snapshot(&self) -> OverrideRecord {
        let base = OverrideRecord::default();
        let p = &self.prefs;

        let aspect = clamp_index(
            p.get_int(keys::ASPECT_RATIO, base.aspect_ratio.index() as i64),
            AspectRatio::ALL.len() - 1,
        );
        let blending = clamp_index(
            p.get_int(keys::BLENDING_ACCURACY, base.blending.index() as i64),
            BlendingAccuracy::ALL.len() - 1,
        );

        OverrideRecord {
            renderer: Renderer::from_legacy_code(
                p.get_int(keys::RENDERER, base.renderer.legacy_code() as i64),
            ),
            upscale: UpscaleMultiplier::from_float(
                p.get_float(keys::UPSCALE_MULTIPLIER, base.upscale.value() as f64),
            ),
            aspect_ratio: AspectRatio::from_index(aspect).unwrap_or_default(),
            blending: BlendingAccuracy::from_index(blending).unwrap_or_default(),
            widescreen_patches: p.get_bool(keys::WIDESCREEN_PATCHES, base.widescreen_patches),
            no_interlacing_patches: p
                .get_bool(keys::NO_INTERLACING_PATCHES, base.no_interlacing_patches),
            enable_patches: p.get_bool(keys::ENABLE_PATCHES, base.enable_patches),
            enable_cheats: p.get_bool(keys::ENABLE_CHEATS, base.enable_cheats),
        }
    }
}
