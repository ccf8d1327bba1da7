use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Trait for persisting and retrieving opaque tile blobs by key.
///
/// This abstraction lets the tiling pipeline write grids to local disk, to
/// memory in tests, or to any other backend. Keys are relative, `/`-separated
/// names such as `tile_26_07.snp`. Implementations must be thread-safe.
#[async_trait]
pub trait TileStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    async fn write(&self, key: &str, data: Bytes) -> Result<(), StoreError>;

    /// Read the full object stored under `key`.
    ///
    /// Returns [`StoreError::NotFound`] if no object exists.
    async fn read(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Check whether an object exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Get a unique identifier for this store (for logging and cache keys).
    ///
    /// For a filesystem store this is `file://<root>`.
    fn identifier(&self) -> &str;
}

/// Reject keys that are empty, absolute, or step outside the store root.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.starts_with('\\')
        || key.split(['/', '\\']).any(|part| part == ".." || part.is_empty());

    if invalid {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
