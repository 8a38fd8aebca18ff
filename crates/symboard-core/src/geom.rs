//! Logical-pixel geometry: [`Size`] and the per-tile [`Geometry`].

/// A width/height pair in logical pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Computed placement of one tile, in logical pixels.
///
/// Produced by the stretch resolver on every layout pass and handed to the
/// interaction layer for hit-testing. Never carried over between passes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub image_width: f64,
    pub image_height: f64,
    pub image_square_size: f64,
    pub image_top_margin: f64,
    pub border_width: f64,
}

impl Geometry {
    /// Bottom edge (`top + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge (`left + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether the logical point `(x, y)` falls inside the tile box.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Whether the two boxes share any interior area.
    pub fn overlaps(&self, other: &Geometry) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}
