//! Well-known preference keys

/// Opaque grant token for the user-chosen mirror tree
pub const DATA_ROOT_GRANT: &str = "data_root_tree_uri";

/// User-chosen games library location
pub const GAMES_FOLDER: &str = "games_folder_uri";

pub const RENDERER: &str = "renderer";
pub const UPSCALE_MULTIPLIER: &str = "upscale_multiplier";
pub const ASPECT_RATIO: &str = "aspect_ratio";
pub const BLENDING_ACCURACY: &str = "blending_accuracy";
pub const WIDESCREEN_PATCHES: &str = "widescreen_patches";
pub const NO_INTERLACING_PATCHES: &str = "no_interlacing_patches";
pub const ENABLE_PATCHES: &str = "enable_patches";
pub const ENABLE_CHEATS: &str = "enable_cheats";

const CUSTOM_COVER_PREFIX: &str = "custom_cover:";

/// Flag key marking an entity as having a user-imported cover
pub fn custom_cover(key: &str) -> String {
    format!("{CUSTOM_COVER_PREFIX}{key}")
}
