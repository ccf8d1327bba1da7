//! Tile cache for decoded tiles read back from a store.
//!
//! This module provides an LRU cache for decompressed tiles, preventing
//! repeated read/decompress cycles when overlapping composites are assembled
//! from the same grid.
//!
//! # Cache Key
//!
//! Tiles are cached by a composite key including:
//! - Store identifier (e.g. `file:///data/tiles`)
//! - Grid cell column
//! - Grid cell row
//!
//! # Size-Based Eviction
//!
//! The cache tracks the total size of cached tiles in bytes and evicts
//! least-recently-used entries when the capacity is exceeded.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::RwLock;

use super::buffer::Tile;
use super::grid::GridCell;

/// Default cache capacity: 64MB
pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 64 * 1024 * 1024;

/// Default maximum number of entries (to bound LRU overhead)
const DEFAULT_MAX_ENTRIES: usize = 10_000;

// =============================================================================
// Cache Key
// =============================================================================

/// Cache key for decoded tiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileCacheKey {
    /// Store identifier the tile was read from
    pub store: Arc<str>,

    /// Grid column (0-indexed from left)
    pub col: usize,

    /// Grid row (0-indexed from top)
    pub row: usize,
}

impl TileCacheKey {
    /// Create a new cache key.
    pub fn new(store: impl Into<Arc<str>>, cell: GridCell) -> Self {
        Self {
            store: store.into(),
            col: cell.col,
            row: cell.row,
        }
    }
}

// =============================================================================
// Tile Cache
// =============================================================================

/// LRU cache for decoded tiles with size-based capacity.
///
/// Tiles are stored behind `Arc` so a cache hit never copies pixel data.
/// Callers that need to mutate a cached tile must clone it first.
///
/// # Thread Safety
///
/// The cache is thread-safe and can be shared across async tasks via `Arc`.
///
/// # Example
///
/// ```
/// use raster_tiler::tile::{GridCell, Tile, TileCache, TileCacheKey};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = TileCache::new();
///
///     let key = TileCacheKey::new("file:///tiles", GridCell::new(26, 7));
///     let tile = Arc::new(Tile::new(vec![0; 16], 4, 4).unwrap());
///
///     cache.put(key.clone(), tile.clone()).await;
///
///     let cached = cache.get(&key).await;
///     assert_eq!(cached, Some(tile));
/// }
/// ```
pub struct TileCache {
    inner: RwLock<CacheState>,

    /// Maximum total size in bytes
    max_size: usize,
}

/// LRU entries plus the running byte total, guarded by one lock so the two
/// can never disagree.
struct CacheState {
    entries: LruCache<TileCacheKey, Arc<Tile>>,
    size: usize,
}

impl CacheState {
    fn evict_to(&mut self, max_size: usize) {
        while self.size > max_size {
            match self.entries.pop_lru() {
                Some((_, evicted)) => self.size = self.size.saturating_sub(evicted.len()),
                None => break,
            }
        }
    }
}

impl TileCache {
    /// Create a new tile cache with default capacity (64MB).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TILE_CACHE_CAPACITY)
    }

    /// Create a new tile cache with the specified capacity in bytes.
    pub fn with_capacity(max_size: usize) -> Self {
        Self::with_capacity_and_entries(max_size, DEFAULT_MAX_ENTRIES)
    }

    /// Create a new tile cache with specified capacity and maximum entries.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Maximum total size of cached tiles in bytes
    /// * `max_entries` - Maximum number of entries in the cache (at least 1)
    pub fn with_capacity_and_entries(max_size: usize, max_entries: usize) -> Self {
        let entries = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: RwLock::new(CacheState {
                entries: LruCache::new(entries),
                size: 0,
            }),
            max_size,
        }
    }

    /// Get a tile, marking it as recently used.
    pub async fn get(&self, key: &TileCacheKey) -> Option<Arc<Tile>> {
        self.inner.write().await.entries.get(key).cloned()
    }

    /// Check if a tile is cached without updating LRU order.
    pub async fn contains(&self, key: &TileCacheKey) -> bool {
        self.inner.read().await.entries.contains(key)
    }

    /// Store a tile, evicting least-recently-used entries while over capacity.
    ///
    /// A tile larger than the whole capacity is evicted immediately.
    pub async fn put(&self, key: TileCacheKey, tile: Arc<Tile>) {
        let mut state = self.inner.write().await;

        let added = tile.len();
        // `push` hands back either the replaced value or the entry evicted by
        // the entry limit; both leave the byte total.
        if let Some((_, displaced)) = state.entries.push(key, tile) {
            state.size = state.size.saturating_sub(displaced.len());
        }
        state.size += added;

        state.evict_to(self.max_size);
    }

    /// Remove a tile, returning it if it was cached.
    pub async fn remove(&self, key: &TileCacheKey) -> Option<Arc<Tile>> {
        let mut state = self.inner.write().await;
        let removed = state.entries.pop(key)?;
        state.size = state.size.saturating_sub(removed.len());
        Some(removed)
    }

    /// Drop every cached tile.
    pub async fn clear(&self) {
        let mut state = self.inner.write().await;
        state.entries.clear();
        state.size = 0;
    }

    /// Number of cached tiles.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    /// Total bytes of cached pixel data.
    pub async fn size(&self) -> usize {
        self.inner.read().await.size
    }

    /// Maximum capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
