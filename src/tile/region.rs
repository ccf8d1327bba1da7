//! Half-open rectangular regions of a tile's pixel grid.

use std::fmt;

/// The axis-aligned rectangle `[x0, x1) × [y0, y1)`.
///
/// A `Region` on its own carries no bounds information; it is checked
/// against a concrete tile size with [`Region::fits_within`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge (inclusive)
    pub x0: usize,

    /// Top edge (inclusive)
    pub y0: usize,

    /// Right edge (exclusive)
    pub x1: usize,

    /// Bottom edge (exclusive)
    pub y1: usize,
}

impl Region {
    /// Create a region from its corner coordinates.
    pub const fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a region from an origin and a size, or `None` if the far edge
    /// does not fit in `usize`.
    pub fn from_origin(x: usize, y: usize, width: usize, height: usize) -> Option<Self> {
        Some(Self::new(x, y, x.checked_add(width)?, y.checked_add(height)?))
    }

    /// Width of the region, or 0 if `x1 <= x0`.
    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    /// Height of the region, or 0 if `y1 <= y0`.
    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Whether the region has positive extent on both axes.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Whether the region is non-empty and lies inside a `width × height` grid.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        !self.is_empty() && self.x1 <= width && self.y1 <= height
    }

    /// Translate a region expressed in this region's frame into the parent frame.
    pub fn offset(&self, inner: Region) -> Region {
        Region::new(
            self.x0 + inner.x0,
            self.y0 + inner.y0,
            self.x0 + inner.x1,
            self.y0 + inner.y1,
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) x [{}, {})", self.x0, self.x1, self.y0, self.y1)
    }
}
