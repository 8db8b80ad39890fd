//! Path validation
//!
//! Segments and file names are single path components; anything that could
//! step outside the root is rejected.

/// Validate one directory segment or file name
pub fn validate_component(component: &str) -> Result<(), String> {
    if component.is_empty() {
        return Err("empty path component".into());
    }
    if component == "." || component == ".." {
        return Err(format!("relative component '{component}'"));
    }
    if component.contains(['/', '\\', '\0']) {
        return Err(format!("separator in component '{component}'"));
    }
    Ok(())
}
