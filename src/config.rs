//! Configuration management for Raster Tiler.
//!
//! This module provides the CLI surface of the `raster-tiler` binary:
//! - Command-line arguments via clap, one subcommand per workflow step
//! - Environment variables with `TILER_` prefix for the common options
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use raster_tiler::config::{Cli, Command};
//!
//! match Cli::parse().into_command() {
//!     Command::Split(config) => println!("Tiling {}", config.input.display()),
//!     _ => {}
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `TILER_TILE_WIDTH` / `TILER_TILE_HEIGHT` - Tile size (default: 400)
//! - `TILER_COMPRESSION` - Tile codec: raw, snappy, lz4, gzip (default: snappy)
//! - `TILER_CHANNEL` - Channel to tile (default: 0)
//! - `TILER_CACHE_SIZE` - Decoded tile cache size in bytes (default: 64MB)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::codec::{Compression, DEFAULT_COMPRESSION};
use crate::tile::{DEFAULT_TILE_CACHE_CAPACITY, DEFAULT_TILE_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default channel to tile (red for RGB sources).
pub const DEFAULT_CHANNEL: usize = 0;

/// Largest accepted tile edge.
pub const MAX_TILE_SIZE: usize = 65_536;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Raster Tiler - split large rasters into compressed tile grids and stitch
/// tiles back into composites.
#[derive(Parser, Debug, Clone)]
#[command(name = "raster-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Partition one channel of an image into a grid of compressed tiles.
    Split(SplitConfig),

    /// Stitch a run of tiles from one grid row into a PNG.
    Assemble(AssembleConfig),

    /// Crop a rectangular region out of one channel of an image.
    Crop(CropConfig),

    /// Split an image into one grayscale PNG and raw dump per channel.
    Channels(ChannelsConfig),

    /// Compare write/read time and size of every codec on an image.
    Bench(BenchConfig),
}

// =============================================================================
// Split
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct SplitConfig {
    /// Source image (PNG).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory to write tiles and manifest.json into.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Tile width in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "TILER_TILE_WIDTH")]
    pub tile_width: usize,

    /// Tile height in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "TILER_TILE_HEIGHT")]
    pub tile_height: usize,

    /// Channel to tile (0-based).
    #[arg(short, long, default_value_t = DEFAULT_CHANNEL, env = "TILER_CHANNEL")]
    pub channel: usize,

    /// Codec applied to each tile.
    #[arg(long, value_enum, default_value_t = DEFAULT_COMPRESSION, env = "TILER_COMPRESSION")]
    pub compression: Compression,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl SplitConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_tile_size(self.tile_width, self.tile_height)
    }
}

// =============================================================================
// Assemble
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct AssembleConfig {
    /// Directory holding tiles and manifest.json written by `split`.
    #[arg(short, long)]
    pub tiles_dir: PathBuf,

    /// Grid row to read from.
    #[arg(long)]
    pub row: usize,

    /// First column (inclusive).
    #[arg(long)]
    pub col_start: usize,

    /// Last column (exclusive).
    #[arg(long)]
    pub col_end: usize,

    /// Output PNG path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Decoded tile cache size in bytes.
    #[arg(long, default_value_t = DEFAULT_TILE_CACHE_CAPACITY, env = "TILER_CACHE_SIZE")]
    pub cache_size: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl AssembleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.col_end <= self.col_start {
            return Err(format!(
                "col_end ({}) must be greater than col_start ({})",
                self.col_end, self.col_start
            ));
        }
        if self.cache_size == 0 {
            return Err("cache_size must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Number of tiles that will be stitched.
    pub fn tile_count(&self) -> usize {
        self.col_end.saturating_sub(self.col_start)
    }
}

// =============================================================================
// Crop
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct CropConfig {
    /// Source image (PNG).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Channel to crop (0-based).
    #[arg(short, long, default_value_t = DEFAULT_CHANNEL, env = "TILER_CHANNEL")]
    pub channel: usize,

    /// Left edge (inclusive).
    #[arg(long)]
    pub x0: usize,

    /// Top edge (inclusive).
    #[arg(long)]
    pub y0: usize,

    /// Right edge (exclusive).
    #[arg(long)]
    pub x1: usize,

    /// Bottom edge (exclusive).
    #[arg(long)]
    pub y1: usize,

    /// Output PNG path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CropConfig {
    /// Checks the region is non-empty. Bounds are checked against the image
    /// once it is decoded.
    pub fn validate(&self) -> Result<(), String> {
        if self.x1 <= self.x0 || self.y1 <= self.y0 {
            return Err(format!(
                "region [{}, {}) x [{}, {}) is empty",
                self.x0, self.x1, self.y0, self.y1
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Channels
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ChannelsConfig {
    /// Source image (PNG).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory to write channel_<n>.png and channel_<n>.raw into.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Bench
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct BenchConfig {
    /// Source image (PNG).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Scratch directory for the encoded files.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Codecs to compare (default: all).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub codecs: Option<Vec<Compression>>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl BenchConfig {
    /// Codecs selected for the run.
    pub fn selected_codecs(&self) -> Vec<Compression> {
        match &self.codecs {
            Some(codecs) if !codecs.is_empty() => codecs.clone(),
            _ => Compression::ALL.to_vec(),
        }
    }
}

fn validate_tile_size(width: usize, height: usize) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err("tile_width and tile_height must be greater than 0".to_string());
    }
    if width > MAX_TILE_SIZE || height > MAX_TILE_SIZE {
        return Err(format!("tile size must not exceed {}", MAX_TILE_SIZE));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
