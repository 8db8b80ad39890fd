use log::{debug, error, info, warn};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::StoreError;
use crate::prefs::{Preferences, keys};
use crate::storage::filesystem::{CopyError, copy_atomically, write_atomically};
use crate::storage::permissions::{GrantProvider, is_writable};
use crate::storage::results::MirrorOutcome;
use crate::storage::validation::validate_component;
use crate::storage::{DirHandle, DirectoryPath, StorageRoot, StoredFile};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Access to the primary root and the optional mirror root.
///
/// Operations report success as `Option`/`bool` and log the cause of a
/// failure; low-level I/O errors never escape this type.
pub struct StorageBackend {
    primary_root: PathBuf,
    prefs: Arc<Preferences>,
    grants: Arc<dyn GrantProvider>,
    copy_buffer_size: usize,
}

impl StorageBackend {
    pub fn new(
        config: &AppConfig,
        prefs: Arc<Preferences>,
        grants: Arc<dyn GrantProvider>,
    ) -> Self {
        Self {
            primary_root: config.primary_root_path(),
            prefs,
            grants,
            copy_buffer_size: config.copy_buffer_size,
        }
    }

    pub fn preferences(&self) -> &Arc<Preferences> {
        &self.prefs
    }

    pub fn primary_root(&self) -> &Path {
        &self.primary_root
    }

    // ═══ MIRROR GRANT ═══

    /// Record the token of a user-granted tree
    pub fn set_mirror_grant(&self, token: &str) {
        self.prefs.set_string(keys::DATA_ROOT_GRANT, token);
        info!("Mirror grant recorded: {}", token);
    }

    pub fn clear_mirror_grant(&self) {
        self.prefs.remove(keys::DATA_ROOT_GRANT);
        info!("Mirror grant cleared");
    }

    /// The recorded token, valid or not
    pub fn mirror_grant(&self) -> Option<String> {
        self.prefs.get_string(keys::DATA_ROOT_GRANT)
    }

    /// Look up the mirror capability as of now. `Ok(None)` means mirroring
    /// is disabled; `Err(GrantInvalid)` means a token is recorded but unusable.
    pub fn current_mirror_root(&self) -> Result<Option<PathBuf>, StoreError> {
        let Some(token) = self.mirror_grant() else {
            return Ok(None);
        };
        match self.grants.resolve(&token) {
            Some(path) => Ok(Some(path)),
            None => Err(StoreError::GrantInvalid(token)),
        }
    }

    /// True only if a token is recorded and still valid right now
    pub fn has_mirror_root(&self) -> bool {
        matches!(self.current_mirror_root(), Ok(Some(_)))
    }

    fn root_path(&self, root: StorageRoot) -> Option<PathBuf> {
        match root {
            StorageRoot::Primary => Some(self.primary_root.clone()),
            StorageRoot::Mirror => match self.current_mirror_root() {
                Ok(path) => path,
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            },
        }
    }

    // ═══ DIRECTORIES AND FILES ═══

    /// Walk `dir` from the root, creating missing segments where the parent
    /// is writable. Segments created before a failure are left in place.
    pub fn ensure_directory(&self, root: StorageRoot, dir: &DirectoryPath) -> Option<DirHandle> {
        let base = self.root_path(root)?;

        if root == StorageRoot::Primary && !base.exists() {
            if let Err(e) = fs::create_dir_all(&base) {
                error!("Failed to create primary root {}: {}", base.display(), e);
                return None;
            }
        }

        let mut current = base;
        for segment in dir.segments() {
            if let Err(e) = validate_component(segment) {
                warn!("Rejected directory segment in {}: {}", dir, e);
                return None;
            }

            let next = current.join(segment);
            match fs::metadata(&next) {
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => {
                    warn!("{} exists but is not a directory", next.display());
                    return None;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    if !is_writable(&current) {
                        warn!(
                            "Cannot create '{}' under read-only {}",
                            segment,
                            current.display()
                        );
                        return None;
                    }
                    if let Err(e) = fs::create_dir(&next) {
                        warn!("Failed to create directory {}: {}", next.display(), e);
                        return None;
                    }
                    debug!("Created directory {}", next.display());
                }
                Err(e) => {
                    warn!("Unable to access {}: {}", next.display(), e);
                    return None;
                }
            }
            current = next;
        }

        Some(DirHandle {
            root,
            location: current,
        })
    }

    /// Resolve `dir` without creating anything
    fn lookup_directory(&self, root: StorageRoot, dir: &DirectoryPath) -> Option<PathBuf> {
        let mut current = self.root_path(root)?;
        for segment in dir.segments() {
            validate_component(segment).ok()?;
            current = current.join(segment);
        }
        current.is_dir().then_some(current)
    }

    /// Pure lookup; `None` if the directory chain or the file is missing.
    pub fn find_file(
        &self,
        root: StorageRoot,
        dir: &DirectoryPath,
        filename: &str,
    ) -> Option<StoredFile> {
        validate_component(filename).ok()?;
        let location = self.lookup_directory(root, dir)?.join(filename);
        if !location.is_file() {
            return None;
        }
        Some(StoredFile {
            root,
            dir: dir.clone(),
            filename: filename.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            location,
            created: false,
        })
    }

    /// Ensure the directory, then return the existing file or a new empty one.
    pub fn create_or_replace_file(
        &self,
        root: StorageRoot,
        dir: &DirectoryPath,
        filename: &str,
        content_type: &str,
    ) -> Option<StoredFile> {
        let file = self.prepare_file(root, dir, filename, content_type)?;
        if file.created {
            if let Err(e) = File::create(&file.location) {
                warn!("Failed to create {}: {}", file.location.display(), e);
                return None;
            }
            debug!("Created {} ({})", file.location.display(), content_type);
        }
        Some(file)
    }

    /// Ensure the directory and return a handle to `filename` without
    /// creating it. The first successful write brings the file into being,
    /// so readers never see it empty.
    pub fn prepare_file(
        &self,
        root: StorageRoot,
        dir: &DirectoryPath,
        filename: &str,
        content_type: &str,
    ) -> Option<StoredFile> {
        if let Err(e) = validate_component(filename) {
            warn!("Rejected file name in {}: {}", dir, e);
            return None;
        }
        let handle = self.ensure_directory(root, dir)?;
        let location = handle.location.join(filename);

        let created = match fs::metadata(&location) {
            Ok(meta) if meta.is_file() => false,
            Ok(_) => {
                warn!("{} exists but is not a file", location.display());
                return None;
            }
            Err(_) => true,
        };

        Some(StoredFile {
            root,
            dir: dir.clone(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            location,
            created,
        })
    }

    /// Mirror handles are only usable while the grant that produced them holds.
    fn check_usable(&self, file: &StoredFile) -> bool {
        match self.root_path(file.root) {
            Some(base) => file.location.starts_with(&base),
            None => false,
        }
    }

    /// Replace the file's contents with `bytes`
    pub fn write_all(&self, file: &StoredFile, bytes: &[u8]) -> bool {
        if !self.check_usable(file) {
            warn!("Write to {} refused: root unavailable", file);
            return false;
        }
        match write_atomically(&file.location, bytes) {
            Ok(()) => {
                info!("Wrote {} ({} bytes)", file, bytes.len());
                true
            }
            Err(e) => {
                error!("Failed to write {}: {}", file, e);
                self.discard_placeholder(file);
                false
            }
        }
    }

    /// Stream `source` into the file in fixed-size chunks
    pub fn copy_stream(&self, source: &mut dyn Read, file: &StoredFile) -> bool {
        self.copy_from(source, file).is_ok()
    }

    /// `copy_stream` that keeps the failing side: `SourceUnreadable` when
    /// reading `source` broke, `WriteFailed` otherwise.
    pub fn copy_from(&self, source: &mut dyn Read, file: &StoredFile) -> Result<u64, StoreError> {
        if !self.check_usable(file) {
            warn!("Copy to {} refused: root unavailable", file);
            return Err(StoreError::WriteFailed(format!("{file}: root unavailable")));
        }
        match copy_atomically(source, &file.location, self.copy_buffer_size) {
            Ok(n) => {
                info!("Copied {} bytes into {}", n, file);
                Ok(n)
            }
            Err(e) => {
                error!("Failed to copy into {}: {}", file, e);
                self.discard_placeholder(file);
                Err(match e {
                    CopyError::Source(e) => StoreError::SourceUnreadable(e.to_string()),
                    CopyError::Target(e) => StoreError::WriteFailed(format!("{file}: {e}")),
                })
            }
        }
    }

    /// Remove a file this handle created if no write ever filled it
    fn discard_placeholder(&self, file: &StoredFile) {
        if !file.created {
            return;
        }
        let empty = fs::metadata(&file.location).is_ok_and(|m| m.is_file() && m.len() == 0);
        if empty && fs::remove_file(&file.location).is_ok() {
            debug!("Removed empty placeholder {}", file);
        }
    }

    pub fn read_all(&self, file: &StoredFile) -> Option<Vec<u8>> {
        if !self.check_usable(file) {
            return None;
        }
        match fs::read(&file.location) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Failed to read {}: {}", file, e);
                None
            }
        }
    }

    pub fn open_read(&self, file: &StoredFile) -> Option<File> {
        if !self.check_usable(file) {
            return None;
        }
        match File::open(&file.location) {
            Ok(f) => Some(f),
            Err(e) => {
                warn!("Failed to open {}: {}", file, e);
                None
            }
        }
    }

    pub fn delete_file(&self, file: &StoredFile) -> bool {
        if !self.check_usable(file) {
            warn!("Delete of {} refused: root unavailable", file);
            return false;
        }
        match fs::remove_file(&file.location) {
            Ok(()) => {
                info!("Deleted {}", file);
                true
            }
            Err(e) => {
                warn!("Failed to delete {}: {}", file, e);
                false
            }
        }
    }

    /// Walk plain files under `dir` until `matches` accepts one. The size
    /// passed to `matches` is read lazily, only when the predicate asks.
    pub fn any_file<F>(&self, root: StorageRoot, dir: &DirectoryPath, mut matches: F) -> bool
    where
        F: FnMut(&str, &dyn Fn() -> Option<u64>) -> bool,
    {
        let Some(path) = self.lookup_directory(root, dir) else {
            return false;
        };
        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list {}: {}", path.display(), e);
                return false;
            }
        };

        for entry in entries.flatten() {
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let size = || entry.metadata().ok().map(|m| m.len());
            if matches(&name, &size) {
                return true;
            }
        }
        false
    }

    // ═══ MIRROR HELPERS ═══

    /// Best-effort copy of `bytes` into the mirror root
    pub fn mirror_bytes(
        &self,
        dir: &DirectoryPath,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> MirrorOutcome {
        match self.current_mirror_root() {
            Ok(None) => MirrorOutcome::Skipped,
            Err(e) => MirrorOutcome::Failed(e),
            Ok(Some(_)) => {
                let Some(target) =
                    self.create_or_replace_file(StorageRoot::Mirror, dir, filename, content_type)
                else {
                    return MirrorOutcome::Failed(StoreError::WriteFailed(format!(
                        "mirror:{dir}/{filename}"
                    )));
                };
                if self.write_all(&target, bytes) {
                    MirrorOutcome::Written
                } else {
                    MirrorOutcome::Failed(StoreError::WriteFailed(target.to_string()))
                }
            }
        }
    }

    /// Best-effort streamed copy into the mirror root
    pub fn mirror_stream(
        &self,
        dir: &DirectoryPath,
        filename: &str,
        content_type: &str,
        source: &mut dyn Read,
    ) -> MirrorOutcome {
        match self.current_mirror_root() {
            Ok(None) => MirrorOutcome::Skipped,
            Err(e) => MirrorOutcome::Failed(e),
            Ok(Some(_)) => {
                let Some(target) =
                    self.create_or_replace_file(StorageRoot::Mirror, dir, filename, content_type)
                else {
                    return MirrorOutcome::Failed(StoreError::WriteFailed(format!(
                        "mirror:{dir}/{filename}"
                    )));
                };
                if self.copy_stream(source, &target) {
                    MirrorOutcome::Written
                } else {
                    MirrorOutcome::Failed(StoreError::WriteFailed(target.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PersistedGrants;
    use std::io::Cursor;

    struct Fixture {
        _primary: tempfile::TempDir,
        mirror: tempfile::TempDir,
        grants: Arc<PersistedGrants>,
        backend: StorageBackend,
    }

    fn fixture() -> Fixture {
        let primary = tempfile::tempdir().unwrap();
        let mirror = tempfile::tempdir().unwrap();
        let grants = Arc::new(PersistedGrants::new());
        let config = AppConfig::with_root(primary.path());
        let backend = StorageBackend::new(
            &config,
            Arc::new(Preferences::in_memory()),
            grants.clone(),
        );
        Fixture {
            _primary: primary,
            mirror,
            grants,
            backend,
        }
    }

    #[test]
    fn test_mirror_absent_without_token() {
        let f = fixture();
        assert!(!f.backend.has_mirror_root());
        assert!(matches!(f.backend.current_mirror_root(), Ok(None)));
    }

    #[test]
    fn test_mirror_revalidated_every_call() {
        let f = fixture();
        let token = f.grants.grant(f.mirror.path());
        f.backend.set_mirror_grant(&token);
        assert!(f.backend.has_mirror_root());

        f.grants.revoke(&token);
        assert!(!f.backend.has_mirror_root());
        assert!(matches!(
            f.backend.current_mirror_root(),
            Err(StoreError::GrantInvalid(_))
        ));
    }

    #[test]
    fn test_ensure_directory_creates_chain() {
        let f = fixture();
        let dir = DirectoryPath::new(["gamesettings", "nested"]);
        let handle = f.backend.ensure_directory(StorageRoot::Primary, &dir).unwrap();
        assert!(handle.location.is_dir());
        assert!(handle.location.ends_with("gamesettings/nested"));
    }

    #[test]
    fn test_ensure_directory_on_missing_mirror_is_none() {
        let f = fixture();
        let dir = DirectoryPath::new(["covers"]);
        assert!(f.backend.ensure_directory(StorageRoot::Mirror, &dir).is_none());
    }

    #[test]
    fn test_ensure_directory_rejects_traversal() {
        let f = fixture();
        let dir = DirectoryPath::new([".."]);
        assert!(f.backend.ensure_directory(StorageRoot::Primary, &dir).is_none());
    }

    #[test]
    fn test_find_file_never_creates() {
        let f = fixture();
        let dir = DirectoryPath::new(["cheats"]);
        assert!(f.backend.find_file(StorageRoot::Primary, &dir, "SLUS-00000.pnach").is_none());
        assert!(!f.backend.primary_root().join("cheats").exists());
    }

    #[test]
    fn test_create_or_replace_returns_existing() {
        let f = fixture();
        let dir = DirectoryPath::new(["gamesettings"]);
        let file = f
            .backend
            .create_or_replace_file(StorageRoot::Primary, &dir, "SLUS-00000.ini", "text/plain")
            .unwrap();
        assert!(f.backend.write_all(&file, b"[EmuCore]\n"));

        let again = f
            .backend
            .create_or_replace_file(StorageRoot::Primary, &dir, "SLUS-00000.ini", "text/plain")
            .unwrap();
        assert_eq!(again.location, file.location);
        assert_eq!(f.backend.read_all(&again).unwrap(), b"[EmuCore]\n");
    }

    #[test]
    fn test_copy_stream_and_delete() {
        let f = fixture();
        let dir = DirectoryPath::new(["patches"]);
        let file = f
            .backend
            .create_or_replace_file(StorageRoot::Primary, &dir, "SLUS-00000.pnach", DEFAULT_CONTENT_TYPE)
            .unwrap();
        assert!(f.backend.copy_stream(&mut Cursor::new(b"0123456789".to_vec()), &file));
        assert_eq!(fs::read(&file.location).unwrap(), b"0123456789");

        assert!(f.backend.delete_file(&file));
        assert!(f.backend.find_file(StorageRoot::Primary, &dir, "SLUS-00000.pnach").is_none());
        assert!(!f.backend.delete_file(&file));
    }

    #[test]
    fn test_mirror_handle_unusable_after_revoke() {
        let f = fixture();
        let token = f.grants.grant(f.mirror.path());
        f.backend.set_mirror_grant(&token);
        let dir = DirectoryPath::new(["covers"]);
        let file = f
            .backend
            .create_or_replace_file(StorageRoot::Mirror, &dir, "SLUS-00000.png", "image/png")
            .unwrap();

        f.grants.revoke(&token);
        assert!(!f.backend.write_all(&file, b"png"));
    }

    #[test]
    fn test_mirror_bytes_outcomes() {
        let f = fixture();
        let dir = DirectoryPath::new(["gamesettings"]);
        assert!(matches!(
            f.backend.mirror_bytes(&dir, "A.ini", "text/plain", b"x"),
            MirrorOutcome::Skipped
        ));

        let token = f.grants.grant(f.mirror.path());
        f.backend.set_mirror_grant(&token);
        assert!(f.backend.mirror_bytes(&dir, "A.ini", "text/plain", b"x").is_written());
        assert_eq!(fs::read(f.mirror.path().join("gamesettings/A.ini")).unwrap(), b"x");

        f.grants.revoke(&token);
        assert!(matches!(
            f.backend.mirror_bytes(&dir, "A.ini", "text/plain", b"x"),
            MirrorOutcome::Failed(StoreError::GrantInvalid(_))
        ));
    }

    #[test]
    fn test_any_file_skips_directories_and_stops_early() {
        let f = fixture();
        let bios = f.backend.primary_root().join("bios");
        fs::create_dir_all(bios.join("rom0")).unwrap();
        fs::write(bios.join("scph10000.bin"), vec![0u8; 16]).unwrap();
        fs::write(bios.join("readme.txt"), b"hi").unwrap();
        let dir = DirectoryPath::new(["bios"]);

        let mut seen = Vec::new();
        let found = f.backend.any_file(StorageRoot::Primary, &dir, |name, size| {
            seen.push(name.to_string());
            name.ends_with(".bin") && size() == Some(16)
        });
        assert!(found);
        assert!(!seen.contains(&"rom0".to_string()));

        let mut calls = 0;
        assert!(f.backend.any_file(StorageRoot::Primary, &dir, |_, _| {
            calls += 1;
            true
        }));
        assert_eq!(calls, 1);

        assert!(!f.backend.any_file(StorageRoot::Primary, &DirectoryPath::new(["none"]), |_, _| true));
    }

    #[test]
    fn test_prepare_file_does_not_create() {
        let f = fixture();
        let dir = DirectoryPath::new(["gamesettings"]);
        let file = f
            .backend
            .prepare_file(StorageRoot::Primary, &dir, "SLUS-20062.ini", "text/plain")
            .unwrap();
        assert!(file.created);
        assert!(file.location.parent().unwrap().is_dir());
        assert!(!file.location.exists());

        assert!(f.backend.write_all(&file, b"[EmuCore]\n"));
        assert_eq!(fs::read(&file.location).unwrap(), b"[EmuCore]\n");
    }

    #[test]
    fn test_failed_first_copy_removes_placeholder() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "card removed"))
            }
        }

        let f = fixture();
        let dir = DirectoryPath::new(["cheats"]);
        let file = f
            .backend
            .create_or_replace_file(StorageRoot::Primary, &dir, "SLUS-20062.pnach", DEFAULT_CONTENT_TYPE)
            .unwrap();
        assert!(file.created);
        assert!(file.location.exists());

        assert!(matches!(
            f.backend.copy_from(&mut Broken, &file),
            Err(StoreError::SourceUnreadable(_))
        ));
        assert!(!file.location.exists());
    }

    #[test]
    fn test_failed_copy_keeps_existing_file() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "card removed"))
            }
        }

        let f = fixture();
        let dir = DirectoryPath::new(["cheats"]);
        let file = f
            .backend
            .create_or_replace_file(StorageRoot::Primary, &dir, "SLUS-20062.pnach", DEFAULT_CONTENT_TYPE)
            .unwrap();
        assert!(f.backend.write_all(&file, b"old codes"));

        let again = f
            .backend
            .create_or_replace_file(StorageRoot::Primary, &dir, "SLUS-20062.pnach", DEFAULT_CONTENT_TYPE)
            .unwrap();
        assert!(!again.created);
        assert!(!f.backend.copy_stream(&mut Broken, &again));
        assert_eq!(fs::read(&again.location).unwrap(), b"old codes");
    }

    #[test]
    fn test_partial_chain_is_left_in_place() {
        let f = fixture();
        let dir = DirectoryPath::new(["fresh", ".."]);
        assert!(f.backend.ensure_directory(StorageRoot::Primary, &dir).is_none());
        assert!(f.backend.primary_root().join("fresh").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_parent_blocks_creation() {
        use std::os::unix::fs::PermissionsExt;

        let f = fixture();
        let made = f
            .backend
            .ensure_directory(StorageRoot::Primary, &DirectoryPath::new(["saves"]))
            .unwrap()
            .location;
        let locked = made.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind a privileged user
        if fs::create_dir(locked.join("writable_check")).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let dir = DirectoryPath::new(["saves", "locked", "slot0"]);
        assert!(f.backend.ensure_directory(StorageRoot::Primary, &dir).is_none());
        assert!(locked.is_dir());
        assert!(!locked.join("slot0").exists());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
