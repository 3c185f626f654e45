//! File Store - Atomic One-File-Per-Key Blob Persistence
//!
//! Each key is stored as `<data_dir>/<key>.json`. Writes go to a
//! temporary file first and are then atomically renamed over the
//! target, so a reader always sees either the old or the new value,
//! never a partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::ports::store::KeyValueStore;

/// Directory-backed key/value store with atomic writes.
pub struct FileStore {
    /// Directory holding one file per key.
    data_dir: PathBuf,
    /// Suffix counter so concurrent writes never share a tmp file.
    tmp_seq: AtomicU64,
}

impl FileStore {
    /// Create a new file store in the given data directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;

        info!(path = %dir.display(), "File store opened");

        Ok(Self {
            data_dir: dir.to_path_buf(),
            tmp_seq: AtomicU64::new(0),
        })
    }

    /// Directory this store writes into.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Map a key to its file, refusing keys that could escape the directory.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        anyhow::ensure!(!key.is_empty(), "Store key must not be empty");
        anyhow::ensure!(
            !key.starts_with('.')
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@')),
            "Store key {key:?} contains unsupported characters"
        );
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Key absent");
                Ok(None)
            }
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read store file: {}", path.display())),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp_path = self.data_dir.join(format!("{key}.json.{seq}.tmp"));

        // Write to tmp file
        if let Err(e) = fs::write(&tmp_path, value).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e).context("Failed to write tmp store file");
        }

        // Atomic rename
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e).context("Failed to rename store file");
        }

        debug!(path = %path.display(), "Value written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove store file: {}", path.display())),
        }
    }

    async fn is_healthy(&self) -> bool {
        let test_path = self.data_dir.join(".health_check");
        let result = fs::write(&test_path, b"ok").await;
        let _ = fs::remove_file(&test_path).await;
        result.is_ok()
    }
}
