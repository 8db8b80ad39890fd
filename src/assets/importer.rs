use log::{info, warn};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::cover::{CoverCache, NoopCoverCache, render_cover};
use crate::assets::results::{DocumentKind, ImportOutcome};
use crate::entity::EntityId;
use crate::error::StoreError;
use crate::prefs::keys;
use crate::storage::{
    DEFAULT_CONTENT_TYPE, DirectoryPath, MirrorOutcome, StorageBackend, StorageRoot, StoredFile,
    settle,
};

const DOCUMENT_EXT: &str = "pnach";
const COVER_DIR: &str = "covers";
const COVER_CONTENT_TYPE: &str = "image/png";

/// Imports documents and covers for one entity at a time
#[derive(Clone)]
pub struct AssetImporter {
    backend: Arc<StorageBackend>,
    cache: Arc<dyn CoverCache>,
}

impl AssetImporter {
    pub fn new(backend: Arc<StorageBackend>) -> Self {
        Self::with_cache(backend, Arc::new(NoopCoverCache))
    }

    pub fn with_cache(backend: Arc<StorageBackend>, cache: Arc<dyn CoverCache>) -> Self {
        Self { backend, cache }
    }

    fn key_of(entity: &EntityId) -> Result<&str, StoreError> {
        entity.key().ok_or(StoreError::IdentifierUnknown)
    }

    // ═══ DOCUMENTS ═══

    /// Import a cheat or patch file from disk
    pub fn import_document(
        &self,
        entity: &EntityId,
        kind: DocumentKind,
        source: &Path,
    ) -> Result<ImportOutcome, StoreError> {
        Self::key_of(entity)?;
        let mut file = File::open(source).map_err(|e| {
            StoreError::SourceUnreadable(format!("{}: {}", source.display(), e))
        })?;
        self.import_document_from(entity, kind, &mut file)
    }

    /// Copy `source` verbatim to `<primary>/<kind>/<key>.pnach`, then mirror
    /// the written file. Existing files are overwritten.
    pub fn import_document_from(
        &self,
        entity: &EntityId,
        kind: DocumentKind,
        source: &mut dyn Read,
    ) -> Result<ImportOutcome, StoreError> {
        let key = Self::key_of(entity)?;
        let dir = DirectoryPath::new([kind.dir_name()]);
        let file_name = format!("{key}.{DOCUMENT_EXT}");

        let primary = self
            .backend
            .prepare_file(StorageRoot::Primary, &dir, &file_name, DEFAULT_CONTENT_TYPE)
            .ok_or_else(|| StoreError::WriteFailed(format!("{}/{}", kind.dir_name(), file_name)))
            .and_then(|file| self.backend.copy_from(source, &file).map(|_| file));

        let mirror = match &primary {
            Ok(written) => self.mirror_document(&dir, &file_name, written),
            Err(_) => MirrorOutcome::Skipped,
        };
        let mirrored = mirror.is_written();

        let written = settle(key, primary, mirror)?;
        info!("{} imported for {}", kind, key);

        Ok(ImportOutcome {
            key: key.to_string(),
            primary: Some(written.location),
            mirrored,
        })
    }

    fn mirror_document(
        &self,
        dir: &DirectoryPath,
        file_name: &str,
        written: &StoredFile,
    ) -> MirrorOutcome {
        if !self.backend.has_mirror_root() {
            return match self.backend.current_mirror_root() {
                Err(e) => MirrorOutcome::Failed(e),
                Ok(_) => MirrorOutcome::Skipped,
            };
        }
        match self.backend.open_read(written) {
            Some(mut reader) => {
                self.backend
                    .mirror_stream(dir, file_name, DEFAULT_CONTENT_TYPE, &mut reader)
            }
            None => MirrorOutcome::Failed(StoreError::SourceUnreadable(written.to_string())),
        }
    }

    // ═══ COVERS ═══

    /// Import a cover image from disk, blocking the calling thread
    pub fn import_cover_blocking(
        &self,
        entity: &EntityId,
        source: &Path,
    ) -> Result<ImportOutcome, StoreError> {
        Self::key_of(entity)?;
        let bytes = fs::read(source).map_err(|e| {
            StoreError::SourceUnreadable(format!("{}: {}", source.display(), e))
        })?;
        self.import_cover_bytes(entity, &bytes)
    }

    /// Import a cover on the blocking pool; completes once the cover is
    /// stored or has failed. Dropping the future does not cancel the work.
    pub async fn import_cover(
        &self,
        entity: EntityId,
        source: PathBuf,
    ) -> Result<ImportOutcome, StoreError> {
        let importer = self.clone();
        tokio::task::spawn_blocking(move || importer.import_cover_blocking(&entity, &source))
            .await
            .map_err(|e| StoreError::WriteFailed(format!("cover worker: {e}")))?
    }

    /// Rescale `bytes` and store `<mirror>/covers/<key>.png`. Covers have no
    /// primary copy; without a mirror root nothing is stored and the
    /// custom-cover flag is left untouched.
    pub fn import_cover_bytes(
        &self,
        entity: &EntityId,
        bytes: &[u8],
    ) -> Result<ImportOutcome, StoreError> {
        let key = Self::key_of(entity)?;
        let png = render_cover(bytes)?;
        let file_name = format!("{key}.png");

        let mirror = self.backend.mirror_bytes(
            &DirectoryPath::new([COVER_DIR]),
            &file_name,
            COVER_CONTENT_TYPE,
            &png,
        );
        let mirrored = mirror.is_written();
        settle(key, Ok(()), mirror)?;

        if mirrored {
            self.backend
                .preferences()
                .set_bool(&keys::custom_cover(key), true);
            self.cache.invalidate(key);
            info!("Cover saved for {}", key);
        } else {
            warn!("Cover for {} not stored: no usable mirror root", key);
        }

        Ok(ImportOutcome {
            key: key.to_string(),
            primary: None,
            mirrored,
        })
    }

    /// Remove the custom cover and clear its flag. Returns whether a cover
    /// file was deleted.
    pub fn delete_cover(&self, entity: &EntityId) -> Result<bool, StoreError> {
        let key = Self::key_of(entity)?;
        let deleted = self
            .backend
            .find_file(
                StorageRoot::Mirror,
                &DirectoryPath::new([COVER_DIR]),
                &format!("{key}.png"),
            )
            .is_some_and(|file| self.backend.delete_file(&file));

        self.backend
            .preferences()
            .set_bool(&keys::custom_cover(key), false);
        self.cache.invalidate(key);

        if deleted {
            info!("Custom cover deleted for {}", key);
        } else {
            info!("No custom cover found to delete for {}", key);
        }
        Ok(deleted)
    }

    pub fn has_custom_cover(&self, entity: &EntityId) -> bool {
        entity.key().is_some_and(|key| {
            self.backend
                .preferences()
                .get_bool(&keys::custom_cover(key), false)
        })
    }

    /// Location of the stored cover, if the mirror root holds one
    pub fn cover_file(&self, entity: &EntityId) -> Option<PathBuf> {
        let key = entity.key()?;
        self.backend
            .find_file(
                StorageRoot::Mirror,
                &DirectoryPath::new([COVER_DIR]),
                &format!("{key}.png"),
            )
            .map(|file| file.location)
    }
}
