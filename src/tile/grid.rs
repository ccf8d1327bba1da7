//! Regular tile grids and their on-disk manifest.
//!
//! A [`TileGrid`] partitions a `image_width × image_height` raster into cells
//! of `tile_width × tile_height`, addressed by `(col, row)` from the top-left.
//! When the image size is not a multiple of the tile size, the last column
//! and row are clipped to the image edge instead of being dropped.

use serde::{Deserialize, Serialize};

use crate::codec::Compression;
use crate::error::GridError;

use super::region::Region;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: usize = 400;

/// Key under which a grid's manifest is stored.
pub const MANIFEST_KEY: &str = "manifest.json";

// =============================================================================
// Grid Cell
// =============================================================================

/// A `(col, row)` position in a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    /// Column index (0-indexed from left)
    pub col: usize,

    /// Row index (0-indexed from top)
    pub row: usize,
}

impl GridCell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// File name for this cell's tile: `tile_{col:02}_{row:02}.{ext}`.
    pub fn file_name(&self, compression: Compression) -> String {
        format!(
            "tile_{:02}_{:02}.{}",
            self.col,
            self.row,
            compression.extension()
        )
    }

    /// Parse a cell and codec back out of a tile file name.
    pub fn parse_file_name(name: &str) -> Option<(GridCell, Compression)> {
        let rest = name.strip_prefix("tile_")?;
        let (coords, ext) = rest.rsplit_once('.')?;
        let (col, row) = coords.split_once('_')?;
        let compression = Compression::from_extension(ext).ok()?;
        Some((GridCell::new(col.parse().ok()?, row.parse().ok()?), compression))
    }
}

// =============================================================================
// Tile Grid
// =============================================================================

/// Geometry of a regular tile grid over an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    image_width: usize,
    image_height: usize,
    tile_width: usize,
    tile_height: usize,
}

impl TileGrid {
    /// Create a grid of `tile_width × tile_height` cells over an image.
    pub fn new(
        image_width: usize,
        image_height: usize,
        tile_width: usize,
        tile_height: usize,
    ) -> Result<Self, GridError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(GridError::ZeroTileSize);
        }
        if image_width == 0 || image_height == 0 {
            return Err(GridError::ZeroImageSize);
        }

        Ok(Self {
            image_width,
            image_height,
            tile_width,
            tile_height,
        })
    }

    /// Create a grid of square tiles.
    pub fn square(image_width: usize, image_height: usize, tile_size: usize) -> Result<Self, GridError> {
        Self::new(image_width, image_height, tile_size, tile_size)
    }

    pub fn image_size(&self) -> (usize, usize) {
        (self.image_width, self.image_height)
    }

    pub fn tile_size(&self) -> (usize, usize) {
        (self.tile_width, self.tile_height)
    }

    /// Number of columns, counting a clipped last column.
    pub fn columns(&self) -> usize {
        self.image_width.div_ceil(self.tile_width)
    }

    /// Number of rows, counting a clipped last row.
    pub fn rows(&self) -> usize {
        self.image_height.div_ceil(self.tile_height)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Whether every cell has the full tile size.
    pub fn is_exact(&self) -> bool {
        self.image_width % self.tile_width == 0 && self.image_height % self.tile_height == 0
    }

    fn check_cell(&self, cell: GridCell) -> Result<(), GridError> {
        if cell.col >= self.columns() || cell.row >= self.rows() {
            return Err(GridError::CellOutOfBounds {
                col: cell.col,
                row: cell.row,
                columns: self.columns(),
                rows: self.rows(),
            });
        }
        Ok(())
    }

    /// Pixel region covered by `cell`, clipped to the image edge.
    pub fn cell_region(&self, cell: GridCell) -> Result<Region, GridError> {
        self.check_cell(cell)?;

        // In range, so x0 < image_width and y0 < image_height
        let x0 = cell.col * self.tile_width;
        let y0 = cell.row * self.tile_height;
        let width = self.tile_width.min(self.image_width - x0);
        let height = self.tile_height.min(self.image_height - y0);

        Region::from_origin(x0, y0, width, height).ok_or(GridError::CellOutOfBounds {
            col: cell.col,
            row: cell.row,
            columns: self.columns(),
            rows: self.rows(),
        })
    }

    /// Region covering columns `col_start..col_end` of `row`.
    pub fn row_span(&self, row: usize, col_start: usize, col_end: usize) -> Result<Region, GridError> {
        if col_end <= col_start {
            return Err(GridError::CellOutOfBounds {
                col: col_end,
                row,
                columns: self.columns(),
                rows: self.rows(),
            });
        }

        let first = self.cell_region(GridCell::new(col_start, row))?;
        let last = self.cell_region(GridCell::new(col_end - 1, row))?;
        Ok(Region::new(first.x0, first.y0, last.x1, last.y1))
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        let columns = self.columns();
        (0..self.rows()).flat_map(move |row| (0..columns).map(move |col| GridCell::new(col, row)))
    }

    /// Rebuild a grid from a stored manifest.
    pub fn from_manifest(manifest: &GridManifest) -> Result<Self, GridError> {
        let grid = Self::new(
            manifest.image_width,
            manifest.image_height,
            manifest.tile_width,
            manifest.tile_height,
        )?;

        if grid.columns() != manifest.columns || grid.rows() != manifest.rows {
            return Err(GridError::Manifest(format!(
                "manifest declares {}x{} cells but geometry implies {}x{}",
                manifest.columns,
                manifest.rows,
                grid.columns(),
                grid.rows()
            )));
        }

        Ok(grid)
    }
}

// =============================================================================
// Manifest
// =============================================================================

/// Description of a persisted grid, stored as JSON next to its tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridManifest {
    pub image_width: usize,
    pub image_height: usize,
    pub tile_width: usize,
    pub tile_height: usize,
    pub columns: usize,
    pub rows: usize,
    pub compression: Compression,
}

impl GridManifest {
    /// Describe `grid` persisted with `compression`.
    pub fn new(grid: &TileGrid, compression: Compression) -> Self {
        Self {
            image_width: grid.image_width,
            image_height: grid.image_height,
            tile_width: grid.tile_width,
            tile_height: grid.tile_height,
            columns: grid.columns(),
            rows: grid.rows(),
            compression,
        }
    }

    /// Storage key of a cell's tile.
    pub fn tile_key(&self, cell: GridCell) -> String {
        cell.file_name(self.compression)
    }

    pub fn to_json(&self) -> Result<String, GridError> {
        serde_json::to_string_pretty(self).map_err(|e| GridError::Manifest(e.to_string()))
    }

    pub fn from_json(json: &[u8]) -> Result<Self, GridError> {
        serde_json::from_slice(json).map_err(|e| GridError::Manifest(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
