//! # Raster Tiler
//!
//! Tiling and reassembly of large single-channel rasters.
//!
//! This library cuts a large image, stored as a flat row-major byte buffer,
//! into a regular grid of tiles, persists each tile through a byte-stream
//! codec, and later stitches any run of tiles back into a wider composite.
//!
//! ## Features
//!
//! - **Copying tile core**: [`Tile::subset`] and [`concat`] always return
//!   independently owned buffers, built from contiguous row copies
//! - **Strict validation**: out-of-range regions, mismatched tiles and
//!   malformed buffers are reported, never clamped or padded
//! - **Interchangeable codecs**: raw, Snappy, LZ4 and Gzip tile files
//! - **Grid manifests**: every persisted grid carries a JSON description
//! - **Decoded tile cache**: repeated composites skip disk and decompression
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`tile`] - Tile buffers, subset/concat, grids, cache and tiling service
//! - [`codec`] - Byte-stream compression codecs
//! - [`mod@format`] - PNG decode/encode and channel splitting
//! - [`io`] - Tile persistence
//! - [`bench`] - Codec size/speed comparison
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust
//! use raster_tiler::{concat, Tile, TileError};
//!
//! let source = Tile::from_fn(10, 10, |x, y| (x + 10 * y) as u8).unwrap();
//!
//! // The far corner is a valid 2x2 region...
//! let corner = source.subset(8, 8, 10, 10).unwrap();
//! assert_eq!(corner.dimensions(), (2, 2));
//!
//! // ...one pixel further is not.
//! assert!(matches!(
//!     source.subset(8, 8, 11, 10),
//!     Err(TileError::InvalidRegion { .. })
//! ));
//!
//! let halves = [
//!     source.subset(0, 0, 5, 10).unwrap(),
//!     source.subset(5, 0, 10, 10).unwrap(),
//! ];
//! assert_eq!(concat(&halves).unwrap(), source);
//! ```

pub mod bench;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod tile;

// Re-export commonly used types
pub use bench::{bench_codec, bench_codecs, CodecReport};
pub use codec::{Compression, DEFAULT_COMPRESSION};
pub use config::{
    AssembleConfig, BenchConfig, ChannelsConfig, Cli, Command, CropConfig, SplitConfig,
};
pub use error::{CodecError, GridError, ImageError, PipelineError, StoreError, TileError};
pub use format::{
    decode_image, encode_gray_png, encode_interleaved_png, extract_channel, split_channels,
    DecodedImage,
};
pub use io::{FsTileStore, TileStore};
pub use tile::{
    concat, GridCell, GridManifest, Region, Tile, TileCache, TileCacheKey, TileFetch, TileGrid,
    TileView, TilingService, DEFAULT_TILE_CACHE_CAPACITY, DEFAULT_TILE_SIZE, MANIFEST_KEY,
};
