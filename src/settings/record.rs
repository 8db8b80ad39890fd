//! Override records and layering
//!
//! A stored override is a partial layer; resolution merges it over the
//! current global defaults one field at a time.

use crate::settings::values::{AspectRatio, BlendingAccuracy, Renderer, UpscaleMultiplier};

/// Fully resolved per-game configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideRecord {
    pub renderer: Renderer,
    pub upscale: UpscaleMultiplier,
    pub aspect_ratio: AspectRatio,
    pub blending: BlendingAccuracy,
    pub widescreen_patches: bool,
    pub no_interlacing_patches: bool,
    pub enable_patches: bool,
    pub enable_cheats: bool,
}

impl Default for OverrideRecord {
    fn default() -> Self {
        Self {
            renderer: Renderer::Auto,
            upscale: UpscaleMultiplier::default(),
            aspect_ratio: AspectRatio::Auto,
            blending: BlendingAccuracy::Basic,
            widescreen_patches: true,
            no_interlacing_patches: true,
            enable_patches: true,
            enable_cheats: false,
        }
    }
}

/// Fields present in a stored override; `None` defers to the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideLayer {
    pub renderer: Option<Renderer>,
    pub upscale: Option<UpscaleMultiplier>,
    pub aspect_ratio: Option<AspectRatio>,
    pub blending: Option<BlendingAccuracy>,
    pub widescreen_patches: Option<bool>,
    pub no_interlacing_patches: Option<bool>,
    pub enable_patches: Option<bool>,
    pub enable_cheats: Option<bool>,
}

impl OverrideLayer {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&OverrideRecord> for OverrideLayer {
    fn from(record: &OverrideRecord) -> Self {
        Self {
            renderer: Some(record.renderer),
            upscale: Some(record.upscale),
            aspect_ratio: Some(record.aspect_ratio),
            blending: Some(record.blending),
            widescreen_patches: Some(record.widescreen_patches),
            no_interlacing_patches: Some(record.no_interlacing_patches),
            enable_patches: Some(record.enable_patches),
            enable_cheats: Some(record.enable_cheats),
        }
    }
}

/// Override-if-present, else default
pub fn merge(layer: &OverrideLayer, defaults: &OverrideRecord) -> OverrideRecord {
    OverrideRecord {
        renderer: layer.renderer.unwrap_or(defaults.renderer),
        upscale: layer.upscale.unwrap_or(defaults.upscale),
        aspect_ratio: layer.aspect_ratio.unwrap_or(defaults.aspect_ratio),
        blending: layer.blending.unwrap_or(defaults.blending),
        widescreen_patches: layer
            .widescreen_patches
            .unwrap_or(defaults.widescreen_patches),
        no_interlacing_patches: layer
            .no_interlacing_patches
            .unwrap_or(defaults.no_interlacing_patches),
        enable_patches: layer.enable_patches.unwrap_or(defaults.enable_patches),
        enable_cheats: layer.enable_cheats.unwrap_or(defaults.enable_cheats),
    }
}

/// Payload handed to the emulation core
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub renderer_code: i32,
    pub upscale_multiplier: f32,
    pub aspect_ratio: usize,
    pub blending_level: usize,
    pub widescreen_patches: bool,
    pub no_interlacing_patches: bool,
    pub enable_patches: bool,
    pub enable_cheats: bool,
}

impl From<&OverrideRecord> for EngineSettings {
    fn from(record: &OverrideRecord) -> Self {
        Self {
            renderer_code: record.renderer.legacy_code(),
            upscale_multiplier: record.upscale.value() as f32,
            aspect_ratio: record.aspect_ratio.index(),
            blending_level: record.blending.index(),
            widescreen_patches: record.widescreen_patches,
            no_interlacing_patches: record.no_interlacing_patches,
            enable_patches: record.enable_patches,
            enable_cheats: record.enable_cheats,
        }
    }
}

/// Narrow "apply settings" hook implemented by the emulation core
pub trait SettingsSink {
    fn apply(&self, settings: &EngineSettings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_layer_yields_defaults() {
        let defaults = OverrideRecord {
            renderer: Renderer::OpenGl,
            upscale: UpscaleMultiplier::new(3),
            ..OverrideRecord::default()
        };
        assert_eq!(merge(&OverrideLayer::default(), &defaults), defaults);
    }

    #[test]
    fn test_field_level_fallback() {
        let layer = OverrideLayer {
            renderer: Some(Renderer::Vulkan),
            enable_cheats: Some(true),
            ..OverrideLayer::default()
        };
        let defaults = OverrideRecord {
            blending: BlendingAccuracy::High,
            widescreen_patches: false,
            ..OverrideRecord::default()
        };

        let merged = merge(&layer, &defaults);
        assert_eq!(merged.renderer, Renderer::Vulkan);
        assert!(merged.enable_cheats);
        assert_eq!(merged.blending, BlendingAccuracy::High);
        assert!(!merged.widescreen_patches);
    }

    #[test]
    fn test_full_layer_ignores_defaults() {
        let record = OverrideRecord {
            renderer: Renderer::Software,
            upscale: UpscaleMultiplier::new(8),
            aspect_ratio: AspectRatio::Stretch,
            blending: BlendingAccuracy::Maximum,
            widescreen_patches: false,
            no_interlacing_patches: false,
            enable_patches: false,
            enable_cheats: true,
        };
        let merged = merge(&OverrideLayer::from(&record), &OverrideRecord::default());
        assert_eq!(merged, record);
    }

    #[test]
    fn test_engine_settings_use_legacy_codes() {
        let record = OverrideRecord {
            renderer: Renderer::Vulkan,
            upscale: UpscaleMultiplier::new(4),
            ..OverrideRecord::default()
        };
        let engine = EngineSettings::from(&record);
        assert_eq!(engine.renderer_code, 14);
        assert_eq!(engine.upscale_multiplier, 4.0);
        assert_eq!(engine.aspect_ratio, 1);
        assert_eq!(engine.blending_level, 1);
    }
}
