//! Points and free vectors in 3D model space.
//!
//! Both types serialize as plain `[x, y, z]` arrays so scene files stay terse.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A location in model space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

/// A direction or displacement in model space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > f64::EPSILON {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Unsigned angle between two vectors in `[0, π]`.
    ///
    /// Returns 0 if either vector has zero length, so repeated sample points
    /// and collapsed spans compare as aligned rather than producing NaN.
    #[must_use]
    pub fn angle_to(&self, other: &Self) -> f64 {
        let (la, lb) = (self.length(), other.length());
        if la < f64::MIN_POSITIVE || lb < f64::MIN_POSITIVE {
            return 0.0;
        }
        // Normalize each side first; the product of two short lengths underflows.
        let cos = (*self * (1.0 / la)).dot(&(*other * (1.0 / lb)));
        cos.clamp(-1.0, 1.0).acos()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add<Vec3> for Point3 {
    type Output = Point3;
    fn add(self, rhs: Vec3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Vec3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_distance_to() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_to_orthogonal_and_opposite() {
        assert!((Vec3::X.angle_to(&Vec3::Y) - FRAC_PI_2).abs() < 1e-12);
        assert!((Vec3::X.angle_to(&-Vec3::X) - PI).abs() < 1e-12);
        assert!(Vec3::X.angle_to(&(Vec3::X * 7.0)) < 1e-7);
    }

    #[test]
    fn test_angle_to_short_vectors() {
        let x = Vec3::new(1e-8, 0.0, 0.0);
        let y = Vec3::new(0.0, 1e-8, 0.0);
        assert!((x.angle_to(&y) - FRAC_PI_2).abs() < 1e-12);
        assert!((x.angle_to(&-x) - PI).abs() < 1e-12);
        assert!(x.angle_to(&Vec3::X) < 1e-7);
    }

    #[test]
    fn test_angle_to_zero_vector_is_zero() {
        assert_eq!(Vec3::ZERO.angle_to(&Vec3::X), 0.0);
        assert_eq!(Vec3::X.angle_to(&Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(0.0, 0.0, 2.0).normalize();
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn test_serde_as_array() {
        let p: Point3 = serde_json::from_str("[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.0,2.0,3.0]");
    }
}
