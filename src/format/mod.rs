//! Image collaborators: decoding, encoding and channel splitting.
//!
//! The tiling core only understands single-channel byte planes. This module
//! turns encoded source images into such planes and turns finished tiles back
//! into images.
//!
//! ```text
//!  PNG bytes ──decode_image──► DecodedImage (interleaved)
//!                                   │
//!                          split_channels / channel_tile
//!                                   ▼
//!                            Tile (one channel)
//!                                   │
//!                           encode_gray_png
//!                                   ▼
//!                               PNG bytes
//! ```

pub mod channels;
pub mod png;

pub use channels::{extract_channel, split_channels};
pub use png::{decode_image, encode_gray_png, encode_interleaved_png, DecodedImage};
