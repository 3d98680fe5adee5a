use serde::{Deserialize, Serialize};

use super::RectangleSize;

/// A 2D pixel coordinate. Negative values are legal: converting a location
/// out of a scrolled context can move it above or left of the screenshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves the point, clamping at the `i32` range instead of overflowing.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn offset_by(self, other: Point) -> Self {
        self.offset(other.x, other.y)
    }

    pub fn negated(self) -> Self {
        Self {
            x: self.x.saturating_neg(),
            y: self.y.saturating_neg(),
        }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const EMPTY: Region = Region {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_parts(location: Point, size: RectangleSize) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    pub fn location(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> RectangleSize {
        RectangleSize::new(self.width, self.height)
    }

    pub fn right(&self) -> i64 {
        i64::from(self.left) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.top) + i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            ..self
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        let (x, y) = (i64::from(point.x), i64::from(point.y));
        x >= i64::from(self.left) && x < self.right() && y >= i64::from(self.top) && y < self.bottom()
    }

    /// Overlap of two regions, or [`Region::EMPTY`] when they do not touch.
    pub fn intersect(&self, other: &Region) -> Region {
        let left = i64::from(self.left.max(other.left));
        let top = i64::from(self.top.max(other.top));
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return Region::EMPTY;
        }

        Region::new(
            left as i32,
            top as i32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
    }
}
