use crate::error::{Result, VoronoiError};
use crate::geometry::Point;

/// Bounding box ID for the left side (x = min_x), it is negative to prevent conflicts with site IDs.
pub const BOX_ID_LEFT: i32 = -1;
/// Bounding box ID for the right side (x = max_x), it is negative to prevent conflicts with site IDs.
pub const BOX_ID_RIGHT: i32 = -2;
/// Bounding box ID for the bottom side (y = min_y), it is negative to prevent conflicts with site IDs.
pub const BOX_ID_BOTTOM: i32 = -3;
/// Bounding box ID for the top side (y = max_y), it is negative to prevent conflicts with site IDs.
pub const BOX_ID_TOP: i32 = -4;

/// Calculates the ID for a bounding box side based on the axis and direction.
///
/// The IDs start at -1 and decrease.
/// - Axis 0 (X) Min: -1
/// - Axis 0 (X) Max: -2
/// - Axis 1 (Y) Min: -3
/// - Axis 1 (Y) Max: -4
pub fn box_side(axis: usize, is_max: bool) -> i32 {
    -1 - (axis * 2 + if is_max { 1 } else { 0 }) as i32
}

/// Axis-aligned clipping rectangle of a diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Creates a box from its four extents, in the `(xmin, ymin, xmax, ymax)` order.
    pub fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min: [min_x, min_y], max: [max_x, max_y] }
    }

    /// Rejects non-finite and empty or inverted rectangles.
    pub fn validate(&self) -> Result<()> {
        if self.min.iter().chain(self.max.iter()).any(|v| !v.is_finite()) {
            return Err(VoronoiError::NonFiniteBounds);
        }
        if self.min[0] >= self.max[0] || self.min[1] >= self.max[1] {
            return Err(VoronoiError::InvalidBounds { min: self.min, max: self.max });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// Largest side length, the scale every tolerance is derived from.
    pub fn extent(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Checks whether the point lies in the closed rectangle, grown by `eps` on all sides.
    pub fn contains(&self, p: Point, eps: f64) -> bool {
        p.x >= self.min[0] - eps
            && p.x <= self.max[0] + eps
            && p.y >= self.min[1] - eps
            && p.y <= self.max[1] + eps
    }

    pub fn center(&self) -> Point {
        Point::new((self.min[0] + self.max[0]) * 0.5, (self.min[1] + self.max[1]) * 0.5)
    }

    /// Corners in counter-clockwise order starting at bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min[0], self.min[1]),
            Point::new(self.max[0], self.min[1]),
            Point::new(self.max[0], self.max[1]),
            Point::new(self.min[0], self.max[1]),
        ]
    }

    /// Moves a point lying within `eps` of a side exactly onto it, and clamps the rest.
    pub fn snap(&self, p: Point, eps: f64) -> Point {
        let snap_axis = |v: f64, lo: f64, hi: f64| {
            if (v - lo).abs() <= eps {
                lo
            } else if (v - hi).abs() <= eps {
                hi
            } else {
                v.clamp(lo, hi)
            }
        };
        Point::new(
            snap_axis(p.x, self.min[0], self.max[0]),
            snap_axis(p.y, self.min[1], self.max[1]),
        )
    }

    /// IDs of the sides the point lies on (at most two, at a corner).
    pub fn sides_of(&self, p: Point, eps: f64) -> Vec<i32> {
        let mut sides = Vec::with_capacity(2);
        for axis in 0..2 {
            let v = if axis == 0 { p.x } else { p.y };
            if (v - self.min[axis]).abs() <= eps {
                sides.push(box_side(axis, false));
            } else if (v - self.max[axis]).abs() <= eps {
                sides.push(box_side(axis, true));
            }
        }
        sides
    }
}
