//! Tile layer.
//!
//! This module holds the tiling core (single-channel tiles with subset and
//! concat) and the orchestration that persists tile grids and stitches
//! composites back together.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             TilingService               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  TileCache   │  │    TileGrid     │  │
//! │  │  (decoded    │  │  (cell layout,  │  │
//! │  │   tiles)     │  │   manifest)     │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │     Tile / TileView / concat (pure)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Tile`]: owned row-major single-channel buffer with width and height
//! - [`Tile::subset`]: copy a rectangular region out as a new tile
//! - [`concat`]: stitch equal-sized tiles left to right
//! - [`TileView`]: borrowed read-only window, for inspection without copies
//! - [`TileGrid`] / [`GridCell`] / [`GridManifest`]: regular grid addressing
//! - [`TilingService`]: writes grids to a [`crate::io::TileStore`] and
//!   assembles composites from them
//! - [`TileCache`]: LRU cache of decoded tiles with size-based eviction
//!
//! # Example
//!
//! ```
//! use raster_tiler::tile::{concat, Tile};
//!
//! let source = Tile::from_fn(8, 4, |x, y| (x + 10 * y) as u8).unwrap();
//!
//! let left = source.subset(0, 0, 4, 4).unwrap();
//! let right = source.subset(4, 0, 8, 4).unwrap();
//!
//! assert_eq!(concat(&[left, right]).unwrap(), source);
//! ```

mod buffer;
mod cache;
mod grid;
mod region;
mod service;

pub use buffer::{concat, Tile, TileView};
pub use cache::{TileCache, TileCacheKey, DEFAULT_TILE_CACHE_CAPACITY};
pub use grid::{GridCell, GridManifest, TileGrid, DEFAULT_TILE_SIZE, MANIFEST_KEY};
pub use region::Region;
pub use service::{TileFetch, TilingService};
