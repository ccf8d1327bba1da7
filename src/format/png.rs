//! PNG decoding and grayscale encoding.
//!
//! Source imagery arrives as PNG and is decoded into an interleaved 8-bit
//! buffer. Tiles and composites leave as single-channel (L8) PNGs.
//!
//! # Design Decisions
//!
//! - **8-bit only**: 16-bit and float sources are converted to RGBA8 on decode,
//!   since tiles carry one byte per pixel.
//! - **Any input format**: decoding goes through `image::load_from_memory`, so
//!   any format enabled on the `image` crate is accepted; only PNG is enabled.

use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::{ColorType, ExtendedColorType, ImageEncoder};

use crate::error::ImageError;
use crate::tile::Tile;

use super::channels::extract_channel;

// =============================================================================
// Decoded Image
// =============================================================================

/// An interleaved 8-bit image as produced by [`decode_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Interleaved pixel data, `width * height * channels` bytes
    pub data: Vec<u8>,

    /// Width in pixels
    pub width: usize,

    /// Height in pixels
    pub height: usize,

    /// Samples per pixel (1 = L, 2 = LA, 3 = RGB, 4 = RGBA)
    pub channels: usize,
}

impl DecodedImage {
    /// Extract one channel as a single-channel tile.
    pub fn channel_tile(&self, channel: usize) -> Result<Tile, crate::error::PipelineError> {
        let plane = extract_channel(&self.data, self.channels, channel)?;
        Ok(Tile::new(plane, self.width, self.height)?)
    }
}

// =============================================================================
// Decode / Encode
// =============================================================================

/// Decode an encoded image into an interleaved 8-bit buffer.
///
/// # Errors
///
/// Returns [`ImageError::Decode`] if the bytes are not a valid image.
pub fn decode_image(source: &[u8]) -> Result<DecodedImage, ImageError> {
    let img = image::load_from_memory(source).map_err(|e| ImageError::Decode {
        message: e.to_string(),
    })?;

    let width = img.width() as usize;
    let height = img.height() as usize;

    let (data, channels) = match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => {
            let channels = img.color().channel_count() as usize;
            (img.into_bytes(), channels)
        }
        _ => (img.to_rgba8().into_raw(), 4),
    };

    Ok(DecodedImage {
        data,
        width,
        height,
        channels,
    })
}

/// Encode a single-channel tile as a grayscale PNG.
pub fn encode_gray_png(tile: &Tile) -> Result<Bytes, ImageError> {
    encode_png(tile.data(), tile.width(), tile.height(), ExtendedColorType::L8)
}

/// Encode an interleaved 8-bit buffer as PNG.
///
/// `channels` selects the color type (1 = L, 2 = LA, 3 = RGB, 4 = RGBA).
pub fn encode_interleaved_png(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Bytes, ImageError> {
    let color = match channels {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        _ => {
            return Err(ImageError::Encode {
                message: format!("unsupported channel count {}", channels),
            })
        }
    };
    encode_png(data, width, height, color)
}

fn encode_png(
    data: &[u8],
    width: usize,
    height: usize,
    color: ExtendedColorType,
) -> Result<Bytes, ImageError> {
    let to_u32 = |v: usize| {
        u32::try_from(v).map_err(|_| ImageError::Encode {
            message: format!("dimension {} exceeds PNG limits", v),
        })
    };
    let (width, height) = (to_u32(width)?, to_u32(height)?);

    let mut output = Vec::new();
    PngEncoder::new(&mut output)
        .write_image(data, width, height, color)
        .map_err(|e| ImageError::Encode {
            message: e.to_string(),
        })?;

    Ok(Bytes::from(output))
}

// =============================================================================
// Tests
// =============================================================================
