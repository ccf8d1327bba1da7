use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::store::{validate_key, TileStore};
use crate::error::StoreError;

/// Filesystem-backed implementation of TileStore.
///
/// Every key maps to a file under `root`. Directories are created on demand,
/// so a store can point at a directory that does not exist yet.
#[derive(Debug, Clone)]
pub struct FsTileStore {
    root: PathBuf,
    identifier: String,
}

impl FsTileStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let identifier = format!("file://{}", root.display());
        Self { root, identifier }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its file path, rejecting keys that escape the root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn io_error(path: &Path, e: std::io::Error) -> StoreError {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound(path.display().to_string())
        } else {
            StoreError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl TileStore for FsTileStore {
    async fn write(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let start = Instant::now();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                })?;
        }

        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| Self::io_error(&path, e))?;

        debug!(
            path = %path.display(),
            bytes = data.len(),
            elapsed = ?start.elapsed(),
            "Wrote file to disk"
        );
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Bytes, StoreError> {
        let path = self.path_for(key)?;
        let start = Instant::now();

        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| Self::io_error(&path, e))?;

        debug!(
            path = %path.display(),
            bytes = data.len(),
            elapsed = ?start.elapsed(),
            "Read file from disk"
        );
        Ok(Bytes::from(data))
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| Self::io_error(&path, e))
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
