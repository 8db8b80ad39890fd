//! Import result types

use std::fmt;
use std::path::PathBuf;

/// Category of an imported patch document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Cheats,
    Patches,
}

impl DocumentKind {
    /// Directory under each root
    pub fn dir_name(self) -> &'static str {
        match self {
            DocumentKind::Cheats => "cheats",
            DocumentKind::Patches => "patches",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Cheats => write!(f, "Cheats"),
            DocumentKind::Patches => write!(f, "Patch Codes"),
        }
    }
}

/// Where an import landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub key: String,
    /// Primary copy, if the flow keeps one
    pub primary: Option<PathBuf>,
    pub mirrored: bool,
}
