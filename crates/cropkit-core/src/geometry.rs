//! Geometry primitives shared across the crop engine.
//!
//! All interactive geometry is expressed in **image-pixel** coordinates with
//! the origin at the top-left corner. Two rectangle representations exist
//! because the gesture code works on edges (`Area`) while consumers want an
//! origin plus dimensions (`CardinalArea`); conversions between the two are
//! lossless.

use serde::{Deserialize, Serialize};

/// A 2D point in image-pixel coordinates.
///
/// Signed so that pointer deltas can be represented with the same type;
/// positions produced by the coordinate mapper are always >= 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Difference `self - earlier`, i.e. the movement from `earlier` to `self`.
    pub fn delta_from(&self, earlier: Position) -> Position {
        Position {
            x: self.x - earlier.x,
            y: self.y - earlier.y,
        }
    }
}

/// A rectangle's dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle expressed by its four edges, in image pixels.
///
/// Normalized on construction: `right >= left` and `bottom >= top` always
/// hold for values produced by [`Area::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Area {
    /// Build a normalized area from two opposite edges per axis.
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top: top.min(bottom),
            right: right.max(left),
            bottom: bottom.max(top),
            left: left.min(right),
        }
    }

    /// Horizontal span. Never negative for a normalized area.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Vertical span. Never negative for a normalized area.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width().max(0) as u32,
            height: self.height().max(0) as u32,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.left
            && position.x <= self.right
            && position.y >= self.top
            && position.y <= self.bottom
    }

    pub fn to_cardinal(&self) -> CardinalArea {
        CardinalArea {
            x: self.left,
            y: self.top,
            width: self.width().max(0) as u32,
            height: self.height().max(0) as u32,
        }
    }
}

/// A rectangle expressed by its origin and dimensions, in image pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CardinalArea {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_area(&self) -> Area {
        Area {
            top: self.y,
            right: self.x + self.width as i32,
            bottom: self.y + self.height as i32,
            left: self.x,
        }
    }
}

/// Per-axis scale factor between the on-screen surface and the native image.
///
/// The two axes are expected to be equal (uniform scale) but are stored
/// independently to stay robust against layout rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for Ratio {
    fn default() -> Self {
        Self {
            horizontal: 1.0,
            vertical: 1.0,
        }
    }
}

impl Ratio {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// The smaller of the two axis factors, used for zoom-independent sizing.
    pub fn min_axis(&self) -> f64 {
        self.horizontal.min(self.vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_delta() {
        let a = Position::new(10, 20);
        let b = Position::new(25, 5);
        assert_eq!(b.delta_from(a), Position::new(15, -15));
    }

    #[test]
    fn test_area_normalizes_on_construction() {
        let area = Area::new(100, 10, 20, 80);
        assert!(area.right >= area.left);
        assert!(area.bottom >= area.top);
    }

    #[test]
    fn test_area_spans() {
        let area = Area::new(10, 110, 60, 30);
        assert_eq!(area.width(), 80);
        assert_eq!(area.height(), 50);
        assert_eq!(area.size(), Size::new(80, 50));
    }

    #[test]
    fn test_area_contains_edges_inclusive() {
        let area = Area::new(0, 100, 100, 0);
        assert!(area.contains(Position::new(0, 0)));
        assert!(area.contains(Position::new(100, 100)));
        assert!(area.contains(Position::new(50, 50)));
        assert!(!area.contains(Position::new(101, 50)));
        assert!(!area.contains(Position::new(50, -1)));
    }

    #[test]
    fn test_area_cardinal_round_trip() {
        let area = Area::new(5, 90, 45, 15);
        let cardinal = area.to_cardinal();
        assert_eq!(cardinal, CardinalArea::new(15, 5, 75, 40));
        assert_eq!(cardinal.to_area(), area);
    }

    #[test]
    fn test_ratio_default_is_identity() {
        let ratio = Ratio::default();
        assert_eq!(ratio.horizontal, 1.0);
        assert_eq!(ratio.vertical, 1.0);
    }

    #[test]
    fn test_ratio_min_axis() {
        let ratio = Ratio::new(0.5, 0.25);
        assert_eq!(ratio.min_axis(), 0.25);
    }
}
