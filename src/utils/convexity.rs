use super::{
    constants::EPSILON,
    predicates::{orient_2d, orient_2d_value, Orientation},
};
use crate::Point2;

/// Checks if the turn `v0 -> v1 -> v2` is strictly convex, i.e. a left turn.
pub fn is_convex(v0: Point2, v1: Point2, v2: Point2) -> bool {
    orient_2d(v0, v1, v2) == Orientation::CounterClockwise
}

/// Checks if `p` lies in the triangle `abc` by the signs of its barycentric coordinates.
///
/// Works for both windings. Points on the boundary, up to a barycentric tolerance of [`EPSILON`], are contained.
pub fn triangle_contains(a: Point2, b: Point2, c: Point2, p: Point2) -> bool {
    let d0 = orient_2d_value(a, b, p);
    let d1 = orient_2d_value(b, c, p);
    let d2 = orient_2d_value(c, a, p);
    let tol = EPSILON * orient_2d_value(a, b, c).abs();

    let has_neg = d0 < -tol || d1 < -tol || d2 < -tol;
    let has_pos = d0 > tol || d1 > tol || d2 > tol;

    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_convex() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);

        assert!(is_convex(a, b, Point2::new(1.0, 1.0)));
        assert!(!is_convex(a, b, Point2::new(1.0, -1.0)));
        assert!(!is_convex(a, b, Point2::new(2.0, 0.0)));
    }

    #[test]
    fn test_triangle_contains() {
        let (a, b, c) = (
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        );

        assert!(triangle_contains(a, b, c, Point2::new(0.5, 0.5)));
        assert!(triangle_contains(c, b, a, Point2::new(0.5, 0.5)));
        assert!(triangle_contains(a, b, c, Point2::new(1.0, 1.0)));
        assert!(!triangle_contains(a, b, c, Point2::new(1.5, 1.5)));
        assert!(!triangle_contains(a, b, c, Point2::new(-1.0, 0.0)));

        let s = |x: f64, y: f64| Point2::new(x * 1e-4, y * 1e-4);
        assert!(triangle_contains(s(0.0, 0.0), s(2.0, 0.0), s(0.0, 2.0), s(0.5, 0.5)));
        assert!(!triangle_contains(s(0.0, 0.0), s(2.0, 0.0), s(0.0, 2.0), s(1.5, 1.5)));
    }
}
