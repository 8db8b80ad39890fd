//! Override file codec
//!
//! Line-oriented `key=value` text in two bracketed sections. Values are
//! enumerants or booleans, so no quoting or escaping is needed.

use std::collections::HashMap;

use crate::settings::record::{OverrideLayer, OverrideRecord};
use crate::settings::values::{
    AspectRatio, BlendingAccuracy, Renderer, UpscaleMultiplier, parse_flag,
};

pub const RENDER_SECTION: &str = "EmuCore/GS";
pub const FEATURE_SECTION: &str = "EmuCore";

pub const KEY_RENDERER: &str = "Renderer";
pub const KEY_UPSCALE: &str = "upscale_multiplier";
pub const KEY_ASPECT: &str = "AspectRatio";
pub const KEY_BLENDING: &str = "accurate_blending_unit";
pub const KEY_WIDESCREEN: &str = "EnableWideScreenPatches";
pub const KEY_NO_INTERLACING: &str = "EnableNoInterlacingPatches";
pub const KEY_PATCHES: &str = "EnablePatches";
pub const KEY_CHEATS: &str = "EnableCheats";

/// Serialize the whole record
pub fn encode(record: &OverrideRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{RENDER_SECTION}]\n"));
    out.push_str(&format!("{KEY_RENDERER}={}\n", record.renderer.name()));
    out.push_str(&format!("{KEY_UPSCALE}={}\n", record.upscale.value()));
    out.push_str(&format!("{KEY_ASPECT}={}\n", record.aspect_ratio.index()));
    out.push_str(&format!("{KEY_BLENDING}={}\n", record.blending.index()));
    out.push('\n');
    out.push_str(&format!("[{FEATURE_SECTION}]\n"));
    out.push_str(&format!("{KEY_WIDESCREEN}={}\n", record.widescreen_patches));
    out.push_str(&format!(
        "{KEY_NO_INTERLACING}={}\n",
        record.no_interlacing_patches
    ));
    out.push_str(&format!("{KEY_PATCHES}={}\n", record.enable_patches));
    out.push_str(&format!("{KEY_CHEATS}={}\n", record.enable_cheats));
    out
}

/// Parse whatever fields are present. Keys are matched case-sensitively
/// and the first occurrence wins; malformed values leave the field unset.
pub fn decode(text: &str) -> OverrideLayer {
    let mut entries: HashMap<&str, &str> = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('[') || line.starts_with(';') || line.starts_with('#')
        {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        entries.entry(key.trim()).or_insert(value);
    }

    let field = |key: &str| entries.get(key).copied();

    OverrideLayer {
        renderer: field(KEY_RENDERER).map(Renderer::from_ini_value),
        upscale: field(KEY_UPSCALE).and_then(UpscaleMultiplier::from_ini_value),
        aspect_ratio: field(KEY_ASPECT).map(AspectRatio::from_ini_value),
        blending: field(KEY_BLENDING).map(BlendingAccuracy::from_ini_value),
        widescreen_patches: field(KEY_WIDESCREEN).and_then(parse_flag),
        no_interlacing_patches: field(KEY_NO_INTERLACING).and_then(parse_flag),
        enable_patches: field(KEY_PATCHES).and_then(parse_flag),
        enable_cheats: field(KEY_CHEATS).and_then(parse_flag),
    }
}
