//! Physical rectangles in millimeters and the glyph placements built on them.

use serde::{Deserialize, Serialize};

use crate::models::{CellIndex, EntryId};

/// Axis-aligned rectangle in page space.
///
/// The origin is the top-left corner of the page, x grows to the right and y
/// grows downwards. Units are millimeters unless the rectangle has been
/// projected with [`Rect::scaled`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point as `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns true if `other` lies entirely within this rectangle.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns true if the interiors overlap. Shared edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Shrinks the rectangle by `padding` on every side, never below zero size.
    #[must_use]
    pub fn inset(&self, padding: f64) -> Self {
        let width = (self.width - padding * 2.0).max(0.0);
        let height = (self.height - padding * 2.0).max(0.0);
        Self::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }

    /// Multiplies position and size by independent horizontal and vertical factors.
    #[must_use]
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Largest rectangle with the given aspect that fits inside `self`, centered.
    ///
    /// The natural size is only ever scaled down: content that already fits
    /// keeps its natural dimensions and is centered.
    #[must_use]
    pub fn fit_centered(&self, natural_width: f64, natural_height: f64) -> Self {
        if natural_width <= 0.0 || natural_height <= 0.0 {
            let (cx, cy) = self.center();
            return Self::new(cx, cy, 0.0, 0.0);
        }

        let scale = (self.width / natural_width)
            .min(self.height / natural_height)
            .min(1.0);
        let width = natural_width * scale;
        let height = natural_height * scale;

        Self::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }
}

/// One rendered copy of an entry's symbol, positioned on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedGlyph {
    /// Entry the symbol belongs to
    pub entry_id: EntryId,
    /// Cell the symbol occupies
    pub cell: CellIndex,
    /// Final image rectangle in millimeters
    pub rect: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_ignores_shared_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(9.0, 9.0, 5.0, 5.0);

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(b.intersects(&c));
    }

    #[test]
    fn test_inset_keeps_center() {
        let cell = Rect::new(8.0, 9.0, 37.0, 20.0);
        let inner = cell.inset(2.0);

        assert_eq!(inner, Rect::new(10.0, 11.0, 33.0, 16.0));
        assert_eq!(inner.center(), cell.center());
    }

    #[test]
    fn test_inset_never_negative() {
        let inner = Rect::new(0.0, 0.0, 3.0, 3.0).inset(2.0);
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.height, 0.0);
        assert_eq!(inner.center(), (1.5, 1.5));
    }

    #[test]
    fn test_fit_centered_scales_down_only() {
        let bounds = Rect::new(10.0, 11.0, 33.0, 16.0);

        // Wider than the box: width-limited
        let wide = bounds.fit_centered(66.0, 10.0);
        assert!((wide.width - 33.0).abs() < 1e-9);
        assert!((wide.height - 5.0).abs() < 1e-9);

        // Taller than the box: height-limited
        let tall = bounds.fit_centered(10.0, 32.0);
        assert!((tall.height - 16.0).abs() < 1e-9);
        assert!((tall.width - 5.0).abs() < 1e-9);

        // Small content keeps its natural size
        let small = bounds.fit_centered(20.0, 8.0);
        assert_eq!(small.width, 20.0);
        assert_eq!(small.height, 8.0);

        for fitted in [wide, tall, small] {
            assert!(bounds.contains(&fitted));
            let (cx, cy) = fitted.center();
            assert!((cx - 26.5).abs() < 1e-9);
            assert!((cy - 19.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_scaled() {
        let r = Rect::new(8.0, 9.0, 37.0, 20.0).scaled(2.0, 0.5);
        assert_eq!(r, Rect::new(16.0, 4.5, 74.0, 10.0));
    }
}
