//! Rectangles and points shared by panes, renderers and backends.
//!
//! Pixel rectangles use the bottom-left origin convention: `y` grows upward.
//! Backends with a top-left origin flip on output.

/// A 2D point in data (model) space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Integer pixel rectangle a render pass is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: i32,
    /// Bottom edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Viewport {
    /// Create a new viewport. Negative extents are clamped to zero.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive top edge.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y + self.height
    }

    /// True if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a pixel lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.top()
    }

    /// Intersection of two rectangles; empty (zero-sized) when disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        Self::new(x, y, right - x, top - y)
    }
}

/// Data-space rectangle (`left..right` horizontally, `bottom..top` vertically).
///
/// Reversed bounds are allowed; `width`/`height` are then negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelRect {
    /// Left edge.
    pub left: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Right edge.
    pub right: f64,
    /// Top edge.
    pub top: f64,
}

impl ModelRect {
    /// Create a rectangle from its four edges.
    #[must_use]
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self { left, bottom, right, top }
    }

    /// Signed width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Signed height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) * 0.5, (self.bottom + self.top) * 0.5)
    }

    /// Move all edges by `(dx, dy)`.
    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.right += dx;
        self.bottom += dy;
        self.top += dy;
    }

    /// True if every edge is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.right.is_finite() && self.bottom.is_finite() && self.top.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_edges() {
        let vp = Viewport::new(10, 20, 100, 50);
        assert_eq!(vp.right(), 110);
        assert_eq!(vp.top(), 70);
        assert!(vp.contains(10, 20));
        assert!(!vp.contains(110, 20));
    }

    #[test]
    fn test_viewport_negative_extent_clamped() {
        let vp = Viewport::new(0, 0, -5, 10);
        assert_eq!(vp.width, 0);
        assert!(vp.is_empty());
    }

    #[test]
    fn test_viewport_intersect() {
        let a = Viewport::new(0, 0, 100, 100);
        let b = Viewport::new(50, 60, 100, 100);
        assert_eq!(a.intersect(&b), Viewport::new(50, 60, 50, 40));

        let c = Viewport::new(200, 200, 10, 10);
        assert!(a.intersect(&c).is_empty());
    }

    #[test]
    fn test_model_rect() {
        let mut r = ModelRect::new(0.0, 0.0, 10.0, 4.0);
        assert!((r.width() - 10.0).abs() < 1e-12);
        assert!((r.height() - 4.0).abs() < 1e-12);
        assert_eq!(r.center(), Point::new(5.0, 2.0));
        r.offset(1.0, -1.0);
        assert_eq!(r, ModelRect::new(1.0, -1.0, 11.0, 3.0));
        assert!(r.is_finite());
        assert!(!ModelRect::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
    }
}
