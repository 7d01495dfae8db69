//! Floating point geometric predicates.
//!
//! None of these are exact. Every predicate computes a plain `f64` value and treats it as degenerate when
//! it is within [`EPSILON`] of zero relative to the magnitude of its inputs, so the outcome does not depend
//! on the scale of the coordinates. Nearly collinear or nearly co-circular configurations may be decided
//! either way.

use nalgebra::{Matrix3, Vector2};

use super::constants::EPSILON;
use crate::Point2;

/// The turn direction of three points.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Twice the signed area of the triangle `abc`, positive if `abc` is counter-clockwise.
#[inline]
pub fn orient_2d_value(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).cross(c - a)
}

/// Orientation of the triangle `abc`.
///
/// Collinear if the sine of the angle at `a` is within [`EPSILON`] of zero.
#[inline]
pub fn orient_2d(a: Point2, b: Point2, c: Point2) -> Orientation {
    let value = orient_2d_value(a, b, c);
    let scale = ((b - a).norm2() * (c - a).norm2()).sqrt();

    if value.abs() <= EPSILON * scale {
        Orientation::Collinear
    } else if value > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// Checks if `p` lies strictly inside the circumcircle of the counter-clockwise triangle `abc`.
///
/// For a counter-clockwise triangle the determinant
///
/// ```text
/// | a.x - p.x   a.y - p.y   |a - p|² |
/// | b.x - p.x   b.y - p.y   |b - p|² |
/// | c.x - p.x   c.y - p.y   |c - p|² |
/// ```
///
/// is positive iff `p` is inside the circle. The determinant grows with the fourth power of the coordinates,
/// so it is compared against [`EPSILON`] times the largest squared distance `|x - p|²`, squared.
#[inline]
pub fn in_circle(a: Point2, b: Point2, c: Point2, p: Point2) -> bool {
    let d = a - p;
    let e = b - p;
    let f = c - p;

    #[rustfmt::skip]
    let m = Matrix3::new(
        d.x, d.y, d.norm2(),
        e.x, e.y, e.norm2(),
        f.x, f.y, f.norm2(),
    );

    let scale = d.norm2().max(e.norm2()).max(f.norm2());

    m.determinant() > EPSILON * scale * scale
}

// Offset of the circumcenter of `abc` relative to `a`, `None` for collinear points.
fn circumdelta(a: Point2, b: Point2, c: Point2) -> Option<Vector2<f64>> {
    if orient_2d(a, b, c) == Orientation::Collinear {
        return None;
    }

    let n = (b - a).to_vector();
    let l = (c - a).to_vector();

    let bl = n.norm_squared();
    let cl = l.norm_squared();
    let d = 0.5 / n.perp(&l);

    Some(Vector2::new((l.y * bl - n.y * cl) * d, (n.x * cl - l.x * bl) * d))
}

/// Squared circumradius of the triangle `abc`, [`f64::INFINITY`] if the points are collinear.
pub fn circumradius2(a: Point2, b: Point2, c: Point2) -> f64 {
    circumdelta(a, b, c).map_or(f64::INFINITY, |delta| delta.norm_squared())
}

/// Circumcenter of the triangle `abc`, `None` if the points are collinear.
pub fn circumcenter(a: Point2, b: Point2, c: Point2) -> Option<Point2> {
    circumdelta(a, b, c).map(|delta| a + Point2::from(delta))
}

/// A monotonic substitute for `atan2`, mapping the direction `d` into `[0, 1)`.
///
/// Only the order of the values matters, not the angle itself.
#[inline]
pub fn pseudo_angle(d: Point2) -> f64 {
    let p = d.x / (d.x.abs() + d.y.abs());

    (if d.y > 0.0 { 3.0 - p } else { 1.0 + p }) / 4.0
}

/// Signed area of a polygon given as a vertex ring (shoelace formula), positive if counter-clockwise.
pub fn signed_area(polygon: &[Point2]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }

    let twice_area: f64 = (0..n)
        .map(|i| polygon[i].cross(polygon[(i + 1) % n]))
        .sum();

    twice_area / 2.0
}
