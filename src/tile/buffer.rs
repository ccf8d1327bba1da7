//! Single-channel tile buffers and the subset/concat operations.
//!
//! A [`Tile`] is a flat row-major byte buffer plus explicit width and height.
//! The byte for grid position `(x, y)` lives at `data[x + y * width]`.
//!
//! # Ownership
//!
//! Every tile exclusively owns its buffer. [`Tile::subset`] and [`concat`]
//! always allocate a fresh buffer and never alias their inputs, so mutating
//! a parent after extraction cannot corrupt tiles already cut from it.
//! [`TileView`] is the borrowed, read-only alternative for callers that only
//! need to inspect a region.

use std::borrow::Borrow;

use crate::error::TileError;

use super::region::Region;

// =============================================================================
// Tile
// =============================================================================

/// A rectangular single-channel pixel region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Tile {
    /// Wrap a buffer as a `width × height` tile.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::EmptyTile`] if either dimension is zero and
    /// [`TileError::BufferSizeMismatch`] if `data.len() != width * height`.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self, TileError> {
        if width == 0 || height == 0 {
            return Err(TileError::EmptyTile { width, height });
        }

        let expected = width
            .checked_mul(height)
            .ok_or(TileError::BufferSizeMismatch {
                width,
                height,
                expected: usize::MAX,
                actual: data.len(),
            })?;

        if data.len() != expected {
            return Err(TileError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a tile by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> Result<Self, TileError> {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Row length in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Buffer length in bytes (always `width * height`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`; zero-sized tiles cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying row-major buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to pixel values. The buffer length cannot change.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the tile and return its buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The full extent of this tile as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    /// Pixel value at `(x, y)`, or `None` if out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.data[x + y * self.width])
        } else {
            None
        }
    }

    /// Row `y` as a contiguous slice, or `None` if out of bounds.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y < self.height {
            let start = y * self.width;
            Some(&self.data[start..start + self.width])
        } else {
            None
        }
    }

    /// Iterate over rows top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> {
        self.data.chunks_exact(self.width)
    }

    /// Borrow a read-only view of `region` without copying.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::InvalidRegion`] if the region is empty or does
    /// not fit inside this tile.
    pub fn view(&self, region: Region) -> Result<TileView<'_>, TileError> {
        if !region.fits_within(self.width, self.height) {
            return Err(TileError::InvalidRegion {
                region,
                width: self.width,
                height: self.height,
            });
        }

        Ok(TileView {
            source: self,
            region,
        })
    }

    /// Extract `[x0, x1) × [y0, y1)` as a new, independently owned tile.
    ///
    /// Requires `0 <= x0 < x1 <= width` and `0 <= y0 < y1 <= height`.
    /// Out-of-range or zero-area requests fail with
    /// [`TileError::InvalidRegion`]; nothing is clamped.
    pub fn subset(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> Result<Tile, TileError> {
        self.subset_region(Region::new(x0, y0, x1, y1))
    }

    /// [`Tile::subset`] taking a [`Region`].
    pub fn subset_region(&self, region: Region) -> Result<Tile, TileError> {
        Ok(self.view(region)?.to_tile())
    }
}

impl TryFrom<(Vec<u8>, usize, usize)> for Tile {
    type Error = TileError;

    fn try_from((data, width, height): (Vec<u8>, usize, usize)) -> Result<Self, Self::Error> {
        Tile::new(data, width, height)
    }
}

// =============================================================================
// Tile View
// =============================================================================

/// A borrowed, read-only window onto a region of a [`Tile`].
///
/// Rows of a view are contiguous slices of the parent buffer, so reading a
/// view never copies.
#[derive(Debug, Clone, Copy)]
pub struct TileView<'a> {
    source: &'a Tile,
    region: Region,
}

impl<'a> TileView<'a> {
    /// The region of the parent tile this view covers.
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn width(&self) -> usize {
        self.region.width()
    }

    pub fn height(&self) -> usize {
        self.region.height()
    }

    /// Pixel at `(x, y)` in the view's own frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width() && y < self.height() {
            self.source.pixel(self.region.x0 + x, self.region.y0 + y)
        } else {
            None
        }
    }

    /// Row `j` of the view as a slice of the parent buffer.
    pub fn row(&self, j: usize) -> Option<&'a [u8]> {
        if j >= self.height() {
            return None;
        }
        let start = self.region.x0 + (self.region.y0 + j) * self.source.width;
        Some(&self.source.data[start..start + self.width()])
    }

    /// Iterate over the view's rows top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &'a [u8]> + 'a {
        let source = self.source;
        let region = self.region;
        (region.y0..region.y1).map(move |y| {
            let start = region.x0 + y * source.width;
            &source.data[start..start + region.width()]
        })
    }

    /// Narrow the view to `inner`, given in this view's frame.
    pub fn view(&self, inner: Region) -> Result<TileView<'a>, TileError> {
        if !inner.fits_within(self.width(), self.height()) {
            return Err(TileError::InvalidRegion {
                region: inner,
                width: self.width(),
                height: self.height(),
            });
        }

        Ok(TileView {
            source: self.source,
            region: self.region.offset(inner),
        })
    }

    /// Copy the viewed pixels into a new tile, one row copy per output row.
    pub fn to_tile(&self) -> Tile {
        let mut data = Vec::with_capacity(self.region.area());
        for row in self.rows() {
            data.extend_from_slice(row);
        }

        Tile {
            data,
            width: self.width(),
            height: self.height(),
        }
    }
}

// =============================================================================
// Concat
// =============================================================================

/// Stitch equally sized tiles left to right into one wider tile.
///
/// The output has width `tiles.len() * tile_width` and the shared height.
/// Each output row is assembled from one contiguous row copy per input tile,
/// with no intermediate buffer.
///
/// # Errors
///
/// - [`TileError::EmptyInput`] if `tiles` is empty
/// - [`TileError::DimensionMismatch`] if any tile differs in width or height
///   from the first
pub fn concat<T: Borrow<Tile>>(tiles: &[T]) -> Result<Tile, TileError> {
    let first = tiles.first().ok_or(TileError::EmptyInput)?.borrow();
    let (tile_width, tile_height) = first.dimensions();

    for (index, tile) in tiles.iter().enumerate().skip(1) {
        let tile = tile.borrow();
        if tile.dimensions() != (tile_width, tile_height) {
            return Err(TileError::DimensionMismatch {
                index,
                expected_width: tile_width,
                expected_height: tile_height,
                width: tile.width,
                height: tile.height,
            });
        }
    }

    let width = tile_width * tiles.len();
    let mut data = Vec::with_capacity(width * tile_height);

    for y in 0..tile_height {
        let start = y * tile_width;
        for tile in tiles {
            data.extend_from_slice(&tile.borrow().data[start..start + tile_width]);
        }
    }

    Ok(Tile {
        data,
        width,
        height: tile_height,
    })
}

// =============================================================================
// Tests
// =============================================================================
