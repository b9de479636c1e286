//! Points, rectangles and the millimeter-to-pixel conversion
//!
//! Every component converts layout millimeters through [`mm_to_px`] so
//! that the renderer and the detectors agree on pixel positions.

use serde::{Deserialize, Serialize};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Convert a length in millimeters to pixels at the given resolution.
///
/// The result is not rounded; callers decide how to snap to the grid.
///
/// # Example
///
/// ```
/// use sheetscan_core::mm_to_px;
///
/// assert!((mm_to_px(25.4, 300) - 300.0).abs() < 1e-9);
/// ```
#[inline]
pub fn mm_to_px(mm: f64, dpi: u32) -> f64 {
    mm * dpi as f64 / MM_PER_INCH
}

/// A 2D point with floating-point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a point given in millimeters to pixel space.
    pub fn from_mm(x_mm: f64, y_mm: f64, dpi: u32) -> Self {
        Self::new(mm_to_px(x_mm, dpi), mm_to_px(y_mm, dpi))
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned rectangle with floating-point position and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive)
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (exclusive)
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// The four corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// Shrink the rectangle by `amount` on every side.
    ///
    /// The result never has negative size; an over-inset rectangle
    /// collapses to its center.
    pub fn inset(&self, amount: f64) -> Rect {
        let w = (self.w - 2.0 * amount).max(0.0);
        let h = (self.h - 2.0 * amount).max(0.0);
        let cx = self.x + self.w / 2.0;
        let cy = self.y + self.h / 2.0;
        Rect::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    /// Whether the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}
