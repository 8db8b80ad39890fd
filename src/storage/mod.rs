//! Storage backend
//!
//! Uniform access to the always-available primary root and the optional,
//! revocable mirror root. This is the only module that touches raw storage.

mod backend;
pub mod filesystem;
pub mod permissions;
pub mod results;
pub mod validation;

pub use backend::{DEFAULT_CONTENT_TYPE, StorageBackend};
pub use permissions::{DirectoryGrants, GrantProvider, PersistedGrants};
pub use results::{MirrorOutcome, settle};

use std::fmt;
use std::path::PathBuf;

/// Which of the two storage locations an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageRoot {
    /// App-private, always writable
    Primary,
    /// User-granted tree, re-validated before every use
    Mirror,
}

impl fmt::Display for StorageRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageRoot::Primary => write!(f, "primary"),
            StorageRoot::Mirror => write!(f, "mirror"),
        }
    }
}

/// Ordered path segments relative to a root. Empty segments are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryPath {
    segments: Vec<String>,
}

impl DirectoryPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// The root directory itself
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for DirectoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// A resolved directory inside one of the roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirHandle {
    pub root: StorageRoot,
    pub location: PathBuf,
}

/// Reference to a byte blob. Existence is checked on use, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub root: StorageRoot,
    pub dir: DirectoryPath,
    pub filename: String,
    pub content_type: String,
    pub location: PathBuf,
    /// The file did not exist before this handle was issued. A failed
    /// write removes it again.
    pub created: bool,
}

impl fmt::Display for StoredFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dir.segments().is_empty() {
            write!(f, "{}:/{}", self.root, self.filename)
        } else {
            write!(f, "{}:{}/{}", self.root, self.dir, self.filename)
        }
    }
}
