//! Planar primitives shared by the sweep: points, circumcircles and the parabola
//! arithmetic of the beach line.
//!
//! The sweep line moves towards increasing `y`. A site `f` that has already been
//! swept defines the parabola of points equidistant from `f` and the sweep line
//! `y = d`.

use std::ops::{Add, Mul, Neg, Sub};

/// A point (or vector) in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_sq(self, other: Self) -> f64 {
        let d = self - other;
        d.dot(d)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Self::new(p.0, p.1)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Direction in which the breakpoint between a `left` and a `right` arc travels as the
/// sweep advances. Walking along it keeps `left` on the left-hand side.
pub fn bisector_direction(left: Point, right: Point) -> Point {
    Point::new(left.y - right.y, right.x - left.x)
}

/// Orientation of the arc triple `(left, middle, right)`.
///
/// Negative when the two breakpoints around `middle` converge, i.e. when `middle` will
/// eventually be squeezed out of the beach line.
pub fn turn(left: Point, middle: Point, right: Point) -> f64 {
    (left - middle).cross(right - middle)
}

/// Offset of the circumcenter of `(a, b, c)` from `b`, or `None` if they are collinear.
fn circumcenter_offset(a: Point, b: Point, c: Point) -> Option<Point> {
    let ab = a - b;
    let cb = c - b;
    let d = 2.0 * ab.cross(cb);
    if d == 0.0 || !d.is_finite() {
        return None;
    }
    let ha = ab.dot(ab);
    let hc = cb.dot(cb);
    let rel = Point::new((cb.y * ha - ab.y * hc) / d, (ab.x * hc - cb.x * ha) / d);
    rel.is_finite().then_some(rel)
}

/// Center and radius of the circle through three points, or `None` if they are collinear.
pub fn circumcircle(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    // Relative to `b` to keep the magnitudes small.
    let rel = circumcenter_offset(a, b, c)?;
    Some((b + rel, rel.length()))
}

/// Circle event of the arc triple `(left, middle, right)`: center, radius and the
/// sweep coordinate at which the middle arc collapses (the top of the circle).
pub(crate) fn circle_event(left: Point, middle: Point, right: Point) -> Option<(Point, f64, f64)> {
    let rel = circumcenter_offset(left, middle, right)?;
    let radius = rel.length();
    // rel.y + radius cancels when the center lies far below the middle site.
    let rise = if rel.y < 0.0 { rel.x * rel.x / (radius - rel.y) } else { rel.y + radius };
    Some((middle + rel, radius, middle.y + rise))
}

/// Height of the parabola of `focus` above `x` for the sweep line at `directrix`.
///
/// Returns `None` for a focus on the sweep line, whose parabola degenerates into a
/// vertical ray.
pub fn parabola_y(focus: Point, x: f64, directrix: f64) -> Option<f64> {
    let p = focus.y - directrix;
    if p == 0.0 {
        return None;
    }
    let dx = x - focus.x;
    Some(dx * dx / (2.0 * p) + (focus.y + directrix) * 0.5)
}

/// x-coordinate of the breakpoint between the arc of `left` and the arc of `right` (in
/// that order along the beach line) for the sweep line at `directrix`.
pub fn breakpoint_x(left: Point, right: Point, directrix: f64) -> f64 {
    let pr = right.y - directrix;
    if pr == 0.0 {
        return right.x;
    }
    let pl = left.y - directrix;
    if pl == 0.0 {
        return left.x;
    }

    // With u = x - right.x the two parabolas meet where a u^2 + 2 b u + c = 0.
    let hl = left.x - right.x;
    let a = 1.0 / pr - 1.0 / pl;
    if a == 0.0 {
        return (left.x + right.x) * 0.5;
    }
    let b = hl / pl;
    let c = right.y - left.y - hl * hl / pl;
    let s = (b * b - a * c).max(0.0).sqrt();
    let u = if b > 0.0 { -c / (b + s) } else { (s - b) / a };
    u + right.x
}
