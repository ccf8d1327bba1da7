//! Byte-stream codecs for persisted tiles.
//!
//! Each tile is stored as an opaque compressed blob. The codec is chosen per
//! grid and recorded in the grid manifest, and its file extension is part of
//! every tile's file name.
//!
//! | Codec  | Extension | Format                                  |
//! |--------|-----------|-----------------------------------------|
//! | Raw    | `raw`     | Uncompressed bytes                      |
//! | Snappy | `snp`     | Snappy raw (block) format               |
//! | Lz4    | `lz4`     | LZ4 block with little-endian size prefix |
//! | Gzip   | `gz`      | Gzip container, default level           |

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use clap::ValueEnum;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Upper bound on the LZ4 block expansion ratio.
const LZ4_MAX_RATIO: usize = 255;

/// Default codec for new grids.
pub const DEFAULT_COMPRESSION: Compression = Compression::Snappy;

/// Compression algorithm applied to tile bytes before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Raw,
    Snappy,
    Lz4,
    Gzip,
}

impl Compression {
    /// All supported codecs.
    pub const ALL: [Compression; 4] = [
        Compression::Raw,
        Compression::Snappy,
        Compression::Lz4,
        Compression::Gzip,
    ];

    /// Human-readable codec name.
    pub fn name(&self) -> &'static str {
        match self {
            Compression::Raw => "raw",
            Compression::Snappy => "snappy",
            Compression::Lz4 => "lz4",
            Compression::Gzip => "gzip",
        }
    }

    /// File extension used for tiles written with this codec.
    pub fn extension(&self) -> &'static str {
        match self {
            Compression::Raw => "raw",
            Compression::Snappy => "snp",
            Compression::Lz4 => "lz4",
            Compression::Gzip => "gz",
        }
    }

    /// Look up a codec by file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Result<Self, CodecError> {
        let ext = ext.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|c| c.extension().eq_ignore_ascii_case(ext))
            .ok_or_else(|| CodecError::UnknownExtension(ext.to_string()))
    }

    /// Compress `data`.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Compression::Raw => Ok(data.to_vec()),
            Compression::Snappy => snap::raw::Encoder::new()
                .compress_vec(data)
                .map_err(|e| self.compress_error(e)),
            Compression::Lz4 => Ok(lz4_flex::block::compress_prepend_size(data)),
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(
                    Vec::with_capacity(data.len() / 2),
                    flate2::Compression::default(),
                );
                encoder
                    .write_all(data)
                    .map_err(|e| self.compress_error(e))?;
                encoder.finish().map_err(|e| self.compress_error(e))
            }
        }
    }

    /// Decompress `data`, failing if it is not valid for this codec.
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Compression::Raw => Ok(data.to_vec()),
            Compression::Snappy => snap::raw::Decoder::new()
                .decompress_vec(data)
                .map_err(|e| self.decompress_error(e)),
            Compression::Lz4 => self.decompress_lz4(data),
            Compression::Gzip => {
                let mut decoder = GzDecoder::new(data);
                let mut output = Vec::with_capacity(data.len() * 2);
                decoder
                    .read_to_end(&mut output)
                    .map_err(|e| self.decompress_error(e))?;
                Ok(output)
            }
        }
    }

    /// LZ4 block behind a little-endian `u32` size prefix. The decoded
    /// length must equal the prefix exactly.
    fn decompress_lz4(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let (prefix, block) = match data {
            [a, b, c, d, block @ ..] => (u32::from_le_bytes([*a, *b, *c, *d]) as usize, block),
            _ => return Err(self.decompress_error("missing size prefix")),
        };

        if prefix > block.len().saturating_mul(LZ4_MAX_RATIO).saturating_add(16) {
            return Err(self.decompress_error(format!(
                "declared size {} is impossible for a {} byte block",
                prefix,
                block.len()
            )));
        }

        let output =
            lz4_flex::block::decompress(block, prefix).map_err(|e| self.decompress_error(e))?;
        if output.len() != prefix {
            return Err(self.decompress_error(format!(
                "declared size {} but decoded {} bytes",
                prefix,
                output.len()
            )));
        }
        Ok(output)
    }

    fn compress_error(&self, e: impl fmt::Display) -> CodecError {
        CodecError::Compress {
            codec: self.name(),
            message: e.to_string(),
        }
    }

    fn decompress_error(&self, e: impl fmt::Display) -> CodecError {
        CodecError::Decompress {
            codec: self.name(),
            message: e.to_string(),
        }
    }
}

impl Default for Compression {
    fn default() -> Self {
        DEFAULT_COMPRESSION
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Compression {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .map_or_else(|| Self::from_extension(s), Ok)
    }
}

// =============================================================================
// Tests
// =============================================================================
