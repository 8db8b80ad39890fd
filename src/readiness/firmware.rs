//! Firmware detection
//!
//! A directory counts as holding firmware if any file follows the
//! component-part naming convention, or looks like a full dump by
//! extension and size.

const COMPONENT_NAMES: [&str; 4] = ["rom0", "rom1", "rom2", "erom"];
const DUMP_EXTENSIONS: [&str; 2] = [".bin", ".rom"];

/// Basename or suffix of a BIOS component part
pub fn is_component_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    COMPONENT_NAMES
        .iter()
        .any(|part| lower == *part || lower.ends_with(&format!(".{part}")))
}

pub fn is_dump_candidate(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    DUMP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Whether one file looks like firmware. `size` is only consulted for
/// dump candidates.
pub fn is_firmware_file(name: &str, size: &dyn Fn() -> Option<u64>, min_dump_size: u64) -> bool {
    if is_component_name(name) {
        return true;
    }
    is_dump_candidate(name) && size().is_some_and(|len| len >= min_dump_size)
}
