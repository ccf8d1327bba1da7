use thiserror::Error;

use crate::tile::Region;

/// Errors from the core tile operations (construction, subset, concat).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Requested region is out of bounds or has zero extent
    #[error("Invalid region {region} for a {width}x{height} tile")]
    InvalidRegion {
        region: Region,
        width: usize,
        height: usize,
    },

    /// Concat inputs do not all share the same dimensions
    #[error(
        "Dimension mismatch at tile {index}: expected {expected_width}x{expected_height}, got {width}x{height}"
    )]
    DimensionMismatch {
        index: usize,
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    /// Concat called with no tiles
    #[error("Cannot concatenate an empty sequence of tiles")]
    EmptyInput,

    /// Tile constructed with a zero width or height
    #[error("Tile dimensions must be positive, got {width}x{height}")]
    EmptyTile { width: usize, height: usize },

    /// Buffer length does not equal width * height
    #[error("Buffer size mismatch: {width}x{height} requires {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors from the byte-stream codecs.
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// Compression failed
    #[error("{codec} compression failed: {message}")]
    Compress {
        codec: &'static str,
        message: String,
    },

    /// Input was not validly encoded for the codec
    #[error("{codec} decompression failed: {message}")]
    Decompress {
        codec: &'static str,
        message: String,
    },

    /// Data decoded cleanly but differs from what was encoded
    #[error("{codec} round trip changed the data: wrote {written} bytes, read back {read}")]
    RoundTrip {
        codec: &'static str,
        written: usize,
        read: usize,
    },

    /// File extension does not map to a known codec
    #[error("Unknown codec extension: {0}")]
    UnknownExtension(String),
}

/// Errors from tile persistence.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Object not found
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Key escapes the store root or is otherwise unusable as a path
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Filesystem or other I/O failure
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

/// Errors from image decoding/encoding and channel handling.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("Image decode error: {message}")]
    Decode { message: String },

    #[error("Image encode error: {message}")]
    Encode { message: String },

    /// Interleaved buffer length is not a multiple of the channel count
    #[error("Buffer of {len} bytes cannot be split into {channels} channels")]
    ChannelCount { channels: usize, len: usize },

    #[error("Channel {channel} out of range for a {channels}-channel image")]
    ChannelOutOfRange { channel: usize, channels: usize },
}

/// Errors related to tile grids and their manifests.
#[derive(Debug, Clone, Error)]
pub enum GridError {
    #[error("Tile size must be non-zero")]
    ZeroTileSize,

    #[error("Image size must be non-zero")]
    ZeroImageSize,

    #[error("Cell ({col}, {row}) is outside the {columns}x{rows} grid")]
    CellOutOfBounds {
        col: usize,
        row: usize,
        columns: usize,
        rows: usize,
    },

    /// Grid geometry does not describe the image being tiled
    #[error("Grid covers a {grid_width}x{grid_height} image but the source is {width}x{height}")]
    ImageMismatch {
        grid_width: usize,
        grid_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Manifest error: {0}")]
    Manifest(String),
}

/// Errors surfaced by the tiling pipeline.
///
/// Collaborator failures are wrapped unchanged so callers can match on the
/// original cause.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("Tile error: {0}")]
    Tile(#[from] TileError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}
