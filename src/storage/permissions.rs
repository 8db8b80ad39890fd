//! Permissions
//!
//! Mirror access is a capability that can disappear between calls. A
//! `GrantProvider` answers, at the moment of use, whether a recorded token
//! still opens a directory.

use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Resolves an opaque grant token to a usable directory
pub trait GrantProvider: Send + Sync {
    /// `None` when the grant is unknown, revoked, or its tree is unreachable.
    fn resolve(&self, token: &str) -> Option<PathBuf>;
}

/// Tokens are directory paths; a grant stays valid while the directory is readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryGrants;

impl GrantProvider for DirectoryGrants {
    fn resolve(&self, token: &str) -> Option<PathBuf> {
        let path = PathBuf::from(token);
        is_readable_dir(&path).then_some(path)
    }
}

/// Registry of persisted grants, revocable at any time
#[derive(Debug, Default)]
pub struct PersistedGrants {
    granted: RwLock<HashSet<String>>,
}

impl PersistedGrants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist access to `dir` and return its token
    pub fn grant(&self, dir: &Path) -> String {
        let token = dir.to_string_lossy().to_string();
        let mut granted = self.granted.write().unwrap_or_else(|e| e.into_inner());
        granted.insert(token.clone());
        debug!("Granted mirror access to {}", token);
        token
    }

    pub fn revoke(&self, token: &str) {
        let mut granted = self.granted.write().unwrap_or_else(|e| e.into_inner());
        if granted.remove(token) {
            debug!("Revoked mirror access to {}", token);
        }
    }

    pub fn is_granted(&self, token: &str) -> bool {
        let granted = self.granted.read().unwrap_or_else(|e| e.into_inner());
        granted.contains(token)
    }
}

impl GrantProvider for PersistedGrants {
    fn resolve(&self, token: &str) -> Option<PathBuf> {
        if !self.is_granted(token) {
            return None;
        }
        DirectoryGrants.resolve(token)
    }
}

/// Check that a directory exists and can be listed
pub fn is_readable_dir(path: &Path) -> bool {
    path.is_dir() && fs::read_dir(path).is_ok()
}

/// Check that new entries may be created under `path`
pub fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_grant_requires_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let token = dir.path().to_string_lossy().to_string();
        assert_eq!(DirectoryGrants.resolve(&token), Some(dir.path().to_path_buf()));

        let missing = dir.path().join("missing");
        assert_eq!(DirectoryGrants.resolve(&missing.to_string_lossy()), None);
    }

    #[test]
    fn test_revoked_grant_no_longer_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let grants = PersistedGrants::new();
        let token = grants.grant(dir.path());
        assert!(grants.resolve(&token).is_some());

        grants.revoke(&token);
        assert!(grants.resolve(&token).is_none());
    }

    #[test]
    fn test_grant_invalid_when_tree_removed() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir(&tree).unwrap();
        let grants = PersistedGrants::new();
        let token = grants.grant(&tree);

        fs::remove_dir(&tree).unwrap();
        assert!(grants.is_granted(&token));
        assert!(grants.resolve(&token).is_none());
    }

    #[test]
    fn test_writable_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_writable(dir.path()));
        assert!(!is_writable(&dir.path().join("missing")));
    }
}
