//! Geometry and typography value types shared by the host adapters and the
//! selection engine.
//!
//! All coordinates are CSS-style pixels in `f64`. `Rect` uses a top-left
//! origin with y growing downwards, matching what host platforms report for
//! widget bounding boxes.

use serde::{Deserialize, Serialize};

pub mod style;

pub use style::{BoxSizing, FontVariant, OverflowWrap, TextStyle, TextTransform, WhiteSpace, WordBreak};

/// A 2D point (also used for scroll offsets).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Express `self` in the coordinate space whose origin is `origin`.
    pub fn relative_to(&self, origin: Point) -> Rect {
        self.translate(-origin.x, -origin.y)
    }

    /// Inclusive containment test (points on the edge count as inside).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// Per-side lengths (padding, border widths).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub const ZERO: Edges = Edges::uniform(0.0);

    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Overlay anchor point. Serialized field names follow the host UI layer's
/// `{left, top}` convention.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn union_covers_both() {
        let a = Rect::new(10.0, 10.0, 20.0, 5.0);
        let b = Rect::new(0.0, 20.0, 5.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 10.0, 30.0, 15.0));
    }

    #[test]
    fn relative_to_shifts_origin() {
        let r = Rect::new(110.0, 52.0, 8.0, 16.0);
        assert_eq!(r.relative_to(Point::new(100.0, 50.0)), Rect::new(10.0, 2.0, 8.0, 16.0));
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let r = Rect::new(0.0, 0.0, 100.0, 20.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(100.0, 20.0)));
        assert!(!r.contains(Point::new(100.5, 10.0)));
        assert!(!r.contains(Point::new(50.0, -0.5)));
    }

    #[test]
    fn center_x_is_midpoint() {
        assert_eq!(Rect::new(4.0, 0.0, 10.0, 1.0).center_x(), 9.0);
    }
}
