//! Test utilities for integration tests.
//!
//! This module provides a tracking in-memory store and helpers for building
//! test rasters.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use raster_tiler::error::StoreError;
use raster_tiler::io::TileStore;
use raster_tiler::Tile;

// =============================================================================
// Mock Store with Request Tracking
// =============================================================================

/// An in-memory store that counts reads and writes.
///
/// Clones share objects and counters, so a clone kept by the test observes
/// what the service does with the original.
#[derive(Clone)]
pub struct TrackingMockStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
    identifier: String,
    read_count: Arc<AtomicUsize>,
    write_count: Arc<AtomicUsize>,
}

impl TrackingMockStore {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            identifier: identifier.into(),
            read_count: Arc::new(AtomicUsize::new(0)),
            write_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    pub fn reset_tracking(&self) {
        self.read_count.store(0, Ordering::SeqCst);
        self.write_count.store(0, Ordering::SeqCst);
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Replace a stored object, e.g. to simulate corruption.
    pub async fn overwrite(&self, key: &str, data: Vec<u8>) {
        self.objects
            .write()
            .await
            .insert(key.to_string(), Bytes::from(data));
    }

    pub async fn remove(&self, key: &str) {
        self.objects.write().await.remove(key);
    }
}

#[async_trait]
impl TileStore for TrackingMockStore {
    async fn write(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.objects.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Bytes, StoreError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.objects.read().await.contains_key(key))
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// =============================================================================
// Raster Helpers
// =============================================================================

/// Pixel value at `(x, y)` for [`gradient`]; unique enough that misplaced
/// rows or columns show up.
pub fn gradient_value(x: usize, y: usize) -> u8 {
    ((x * 7 + y * 13) % 251) as u8
}

/// A deterministic single-channel test raster.
pub fn gradient(width: usize, height: usize) -> Tile {
    Tile::from_fn(width, height, gradient_value).unwrap()
}

/// Interleaved RGB buffer with distinct per-channel patterns.
pub fn rgb_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.push(gradient_value(x, y));
            data.push((x % 256) as u8);
            data.push((y % 256) as u8);
        }
    }
    data
}

/// A fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "raster_tiler_it_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
