//! Tiling Service for orchestrating grid persistence and reassembly.
//!
//! The TilingService is the main entry point for the batch workflow. It
//! orchestrates:
//! - Partitioning a source tile into a regular grid
//! - Compressing and persisting each grid cell
//! - Reading cells back through a decoded-tile cache
//! - Stitching selected cells into composites
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          TilingService                           │
//! │  write_grid():  subset ─► compress ─► store.write (per cell)     │
//! │  assemble():    cache? ─► store.read ─► decompress ─► concat     │
//! │           │                    │                     │           │
//! │           ▼                    ▼                     ▼           │
//! │    ┌───────────┐      ┌──────────────┐      ┌──────────────┐     │
//! │    │ TileCache │      │  TileStore   │      │ Compression  │     │
//! │    └───────────┘      └──────────────┘      └──────────────┘     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, info};

use crate::codec::Compression;
use crate::error::{GridError, PipelineError, TileError};
use crate::io::TileStore;

use super::buffer::{concat, Tile};
use super::cache::{TileCache, TileCacheKey};
use super::grid::{GridCell, GridManifest, TileGrid, MANIFEST_KEY};

// =============================================================================
// Tile Fetch
// =============================================================================

/// Result of reading one grid cell.
#[derive(Debug, Clone)]
pub struct TileFetch {
    /// The decoded tile
    pub tile: Arc<Tile>,

    /// Whether this tile was served from cache
    pub cache_hit: bool,
}

// =============================================================================
// Tiling Service
// =============================================================================

/// Service for writing tile grids and assembling composites from them.
///
/// # Type Parameters
///
/// * `S` - The store the grid lives in (e.g. [`crate::io::FsTileStore`])
///
/// # Example
///
/// ```ignore
/// use raster_tiler::io::FsTileStore;
/// use raster_tiler::tile::{Tile, TileGrid, TilingService};
/// use raster_tiler::codec::Compression;
///
/// let service = TilingService::new(FsTileStore::new("tiles/red"));
///
/// let grid = TileGrid::square(source.width(), source.height(), 400)?;
/// let manifest = service.write_grid(&source, grid, Compression::Snappy).await?;
///
/// // Row 7, columns 26..30 as one 1600x400 composite
/// let strip = service.assemble_row(&manifest, 7, 26, 30).await?;
/// ```
pub struct TilingService<S: TileStore> {
    /// Where tiles and manifests are persisted
    store: Arc<S>,

    /// Cache for decoded tiles
    cache: TileCache,
}

impl<S: TileStore> TilingService<S> {
    /// Create a new service with default cache settings.
    pub fn new(store: S) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    /// Create a new service over a store shared with other components.
    pub fn with_shared_store(store: Arc<S>) -> Self {
        Self {
            store,
            cache: TileCache::new(),
        }
    }

    /// Create a new service with a custom tile cache capacity in bytes.
    pub fn with_cache_capacity(store: S, cache_capacity: usize) -> Self {
        Self {
            store: Arc::new(store),
            cache: TileCache::with_capacity(cache_capacity),
        }
    }

    /// Partition `source` into `grid` and persist every cell plus a manifest.
    ///
    /// Cells are extracted, compressed and written one at a time, so at most
    /// one extracted tile is alive at any point.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid was built for a different image size, or
    /// if compression or any store write fails. Cells written before the
    /// failure are left in place; the manifest is only written on success.
    pub async fn write_grid(
        &self,
        source: &Tile,
        grid: TileGrid,
        compression: Compression,
    ) -> Result<GridManifest, PipelineError> {
        let (grid_width, grid_height) = grid.image_size();
        if (grid_width, grid_height) != source.dimensions() {
            return Err(GridError::ImageMismatch {
                grid_width,
                grid_height,
                width: source.width(),
                height: source.height(),
            }
            .into());
        }

        // Cached tiles may belong to a grid this call is about to replace
        self.cache.clear().await;

        let manifest = GridManifest::new(&grid, compression);
        let start = Instant::now();
        let mut written_bytes = 0usize;

        for cell in grid.cells() {
            let region = grid.cell_region(cell)?;
            let tile = source.subset_region(region)?;
            let packed = compression.compress(tile.data())?;
            written_bytes += packed.len();

            let key = manifest.tile_key(cell);
            debug!(%key, %region, compressed = packed.len(), "Writing tile");
            self.store.write(&key, Bytes::from(packed)).await?;
        }

        self.write_manifest(&manifest).await?;

        info!(
            store = self.store.identifier(),
            columns = manifest.columns,
            rows = manifest.rows,
            %compression,
            bytes = written_bytes,
            elapsed = ?start.elapsed(),
            "Wrote tile grid"
        );

        Ok(manifest)
    }

    /// Persist `manifest` under [`MANIFEST_KEY`].
    ///
    /// Decoded tiles cached for this store are dropped, since they may have
    /// been read under a different manifest.
    pub async fn write_manifest(&self, manifest: &GridManifest) -> Result<(), PipelineError> {
        let json = manifest.to_json()?;
        self.store.write(MANIFEST_KEY, Bytes::from(json)).await?;
        self.cache.clear().await;
        Ok(())
    }

    /// Load and validate the manifest of the grid in this store.
    pub async fn load_manifest(&self) -> Result<GridManifest, PipelineError> {
        let json = self.store.read(MANIFEST_KEY).await?;
        let manifest = GridManifest::from_json(&json)?;
        TileGrid::from_manifest(&manifest)?;
        Ok(manifest)
    }

    /// Read one cell, using the cache when available.
    pub async fn read_tile(
        &self,
        manifest: &GridManifest,
        cell: GridCell,
    ) -> Result<Arc<Tile>, PipelineError> {
        Ok(self.fetch_tile(manifest, cell).await?.tile)
    }

    /// Read one cell and report whether it came from the cache.
    ///
    /// # Errors
    ///
    /// - [`GridError::CellOutOfBounds`] if the cell is not in the grid
    /// - Store errors if the tile file is missing or unreadable
    /// - Codec errors if the file is not valid for the manifest's codec
    /// - [`TileError::BufferSizeMismatch`] if the decompressed size does not
    ///   match the cell's dimensions
    pub async fn fetch_tile(
        &self,
        manifest: &GridManifest,
        cell: GridCell,
    ) -> Result<TileFetch, PipelineError> {
        let grid = TileGrid::from_manifest(manifest)?;
        let region = grid.cell_region(cell)?;

        let cache_key = TileCacheKey::new(self.store.identifier(), cell);
        if let Some(tile) = self.cache.get(&cache_key).await {
            if tile.dimensions() == (region.width(), region.height()) {
                return Ok(TileFetch {
                    tile,
                    cache_hit: true,
                });
            }
            debug!(
                %region,
                cached_width = tile.width(),
                cached_height = tile.height(),
                "Dropping cached tile that no longer matches its cell"
            );
            self.cache.remove(&cache_key).await;
        }

        let key = manifest.tile_key(cell);
        let packed = self.store.read(&key).await?;
        let data = manifest.compression.decompress(&packed)?;
        let tile = Arc::new(Tile::new(data, region.width(), region.height())?);

        debug!(%key, width = tile.width(), height = tile.height(), "Loaded tile");
        self.cache.put(cache_key, Arc::clone(&tile)).await;

        Ok(TileFetch {
            tile,
            cache_hit: false,
        })
    }

    /// Read an ordered selection of cells and stitch them left to right.
    ///
    /// # Errors
    ///
    /// Besides read errors, fails with [`TileError::EmptyInput`] for an
    /// empty selection and [`TileError::DimensionMismatch`] if the cells
    /// differ in size (e.g. mixing a clipped edge cell with full cells).
    pub async fn assemble(
        &self,
        manifest: &GridManifest,
        cells: &[GridCell],
    ) -> Result<Tile, PipelineError> {
        if cells.is_empty() {
            return Err(TileError::EmptyInput.into());
        }

        let mut tiles = Vec::with_capacity(cells.len());
        for &cell in cells {
            tiles.push(self.read_tile(manifest, cell).await?);
        }

        let composite = concat(&tiles)?;
        info!(
            cells = cells.len(),
            width = composite.width(),
            height = composite.height(),
            "Assembled composite"
        );
        Ok(composite)
    }

    /// Stitch columns `col_start..col_end` of `row` into one wide tile.
    pub async fn assemble_row(
        &self,
        manifest: &GridManifest,
        row: usize,
        col_start: usize,
        col_end: usize,
    ) -> Result<Tile, PipelineError> {
        let cells: Vec<GridCell> = (col_start..col_end)
            .map(|col| GridCell::new(col, row))
            .collect();
        self.assemble(manifest, &cells).await
    }

    /// Get tile cache statistics.
    ///
    /// Returns `(current_size, capacity, entry_count)`.
    pub async fn cache_stats(&self) -> (usize, usize, usize) {
        let size = self.cache.size().await;
        let capacity = self.cache.capacity();
        let count = self.cache.len().await;
        (size, capacity, count)
    }

    /// Clear the tile cache.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

// =============================================================================
// Tests
// =============================================================================
