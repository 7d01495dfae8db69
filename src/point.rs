use core::fmt;
use core::ops::{Add, Div, Mul, Sub};

use nalgebra::Vector2;

use crate::utils::constants::EPSILON;

/// A point in the plane.
///
/// Equality is epsilon-bounded, i.e. two points are equal if both coordinates differ by less than [`EPSILON`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z-component of the 3D cross product, i.e. `self.x * other.y - self.y * other.x`.
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm2(self) -> f64 {
        self.dot(self)
    }

    /// Squared euclidean distance to `other`.
    pub fn dist2(self, other: Self) -> f64 {
        (self - other).norm2()
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl PartialEq for Point2 {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

impl Add for Point2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point2 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self * (1.0 / rhs)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

impl From<Vector2<f64>> for Point2 {
    fn from(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The plane 3D input is projected onto before any geometric computation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    /// Keep `(x, y)`, drop `z`.
    #[default]
    Xy,
    /// Keep `(x, z)`, drop `y`.
    Xz,
}

/// A point in space, as read from point files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn project(&self, projection: Projection) -> Point2 {
        match projection {
            Projection::Xy => Point2::new(self.x, self.y),
            Projection::Xz => Point2::new(self.x, self.z),
        }
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point2> for Point3 {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_equality() {
        let p = Point2::new(1.0, 2.0);

        assert_eq!(p, Point2::new(1.0 + 1e-10, 2.0 - 1e-10));
        assert_ne!(p, Point2::new(1.0 + 1e-8, 2.0));
        assert_ne!(p, Point2::new(1.0, 2.0 + 1e-8));
    }

    #[test]
    fn test_arithmetic() {
        let p = Point2::new(1.0, 2.0);
        let q = Point2::new(3.0, -1.0);

        assert_eq!(p + q, Point2::new(4.0, 1.0));
        assert_eq!(p - q, Point2::new(-2.0, 3.0));
        assert_eq!(p * 2.0, Point2::new(2.0, 4.0));
        assert_eq!(q / 2.0, Point2::new(1.5, -0.5));
        assert_eq!(p.dot(q), 1.0);
        assert_eq!(p.cross(q), -7.0);
        assert_eq!(p.dist2(q), 13.0);
    }

    #[test]
    fn test_projection() {
        let p = Point3::new(1.0, 2.0, 3.0);

        assert_eq!(p.project(Projection::Xy), Point2::new(1.0, 2.0));
        assert_eq!(p.project(Projection::Xz), Point2::new(1.0, 3.0));
        assert_eq!(Projection::default(), Projection::Xy);
    }
}
