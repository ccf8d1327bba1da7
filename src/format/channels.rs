//! Deinterleaving of multi-channel pixel buffers.
//!
//! Decoded images store samples interleaved (`RGBARGBA...`). Tiling works on
//! one channel at a time, so each channel is first copied out into its own
//! contiguous plane.

use crate::error::ImageError;

/// Split an interleaved buffer into one plane per channel.
///
/// # Errors
///
/// Returns [`ImageError::ChannelCount`] if `channels` is zero or the buffer
/// length is not a multiple of it.
pub fn split_channels(interleaved: &[u8], channels: usize) -> Result<Vec<Vec<u8>>, ImageError> {
    check_layout(interleaved, channels)?;

    let pixels = interleaved.len() / channels;
    let mut planes: Vec<Vec<u8>> = (0..channels).map(|_| Vec::with_capacity(pixels)).collect();

    for pixel in interleaved.chunks_exact(channels) {
        for (plane, &sample) in planes.iter_mut().zip(pixel) {
            plane.push(sample);
        }
    }

    Ok(planes)
}

/// Copy a single channel out of an interleaved buffer.
///
/// # Errors
///
/// Returns [`ImageError::ChannelCount`] for a malformed layout and
/// [`ImageError::ChannelOutOfRange`] if `channel >= channels`.
pub fn extract_channel(
    interleaved: &[u8],
    channels: usize,
    channel: usize,
) -> Result<Vec<u8>, ImageError> {
    check_layout(interleaved, channels)?;

    if channel >= channels {
        return Err(ImageError::ChannelOutOfRange { channel, channels });
    }

    Ok(interleaved
        .iter()
        .skip(channel)
        .step_by(channels)
        .copied()
        .collect())
}

fn check_layout(interleaved: &[u8], channels: usize) -> Result<(), ImageError> {
    if channels == 0 || interleaved.len() % channels != 0 {
        return Err(ImageError::ChannelCount {
            channels,
            len: interleaved.len(),
        });
    }
    Ok(())
}
