//! World-space axis-aligned bounding boxes and parameter intervals.

use serde::{Deserialize, Serialize};

use super::vector::{Point3, Vec3};

/// An axis-aligned box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAlignedBox {
    pub min: Point3,
    pub max: Point3,
}

impl AxisAlignedBox {
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Degenerate box around a single point.
    #[must_use]
    pub fn from_point(p: Point3) -> Self {
        Self { min: p, max: p }
    }

    /// Tightest box containing all points, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |acc, p| acc.including(p)))
    }

    #[must_use]
    pub fn including(&self, p: Point3) -> Self {
        Self {
            min: Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            max: Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        }
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.including(other.min).including(other.max)
    }

    #[must_use]
    pub fn translated(&self, v: Vec3) -> Self {
        Self {
            min: self.min + v,
            max: self.max + v,
        }
    }

    /// Grow the box by `tol` on every axis in both directions.
    #[must_use]
    pub fn expanded(&self, tol: f64) -> Self {
        let d = Vec3::new(tol, tol, tol);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// Inclusive overlap test: boxes sharing only a face still intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    /// True when the boxes are farther apart than `tol` along some axis.
    #[must_use]
    pub fn is_separated_from(&self, other: &Self, tol: f64) -> bool {
        self.min.x > other.max.x + tol
            || self.max.x < other.min.x - tol
            || self.min.y > other.max.y + tol
            || self.max.y < other.min.y - tol
            || self.min.z > other.max.z + tol
            || self.max.z < other.min.z - tol
    }

    /// All eight corners, used when mapping a box through a transform.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// A usable record box: finite and with `min <= max` on every axis.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }
}

/// A closed parameter interval. `t0 > t1` is allowed and reverses direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub t0: f64,
    pub t1: f64,
}

impl Interval {
    #[must_use]
    pub const fn new(t0: f64, t1: f64) -> Self {
        Self { t0, t1 }
    }

    /// Map a normalized fraction in `[0, 1]` into this interval.
    #[must_use]
    pub fn parameter_at(&self, fraction: f64) -> f64 {
        self.t0 + fraction * (self.t1 - self.t0)
    }

    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.t0.min(self.t1) && t <= self.t0.max(self.t1)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.t1 - self.t0).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> AxisAlignedBox {
        AxisAlignedBox::new(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_from_points() {
        let b = AxisAlignedBox::from_points(vec![
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-1.0, 3.0, 0.0),
        ])
        .unwrap();
        assert_eq!(b.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Point3::new(1.0, 3.0, 0.5));
        assert!(AxisAlignedBox::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_intersects_touching_counts() {
        let a = unit_box();
        let b = a.translated(Vec3::new(1.0, 0.0, 0.0));
        assert!(a.intersects(&b));
        let c = a.translated(Vec3::new(1.0001, 0.0, 0.0));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_expanded_boxes_meet_at_tolerance() {
        let a = AxisAlignedBox::from_point(Point3::ORIGIN);
        let b = AxisAlignedBox::from_point(Point3::new(0.5, 0.0, 0.0));
        assert!(a.expanded(0.25).intersects(&b.expanded(0.25)));
        assert!(!a.expanded(0.2).intersects(&b.expanded(0.2)));
    }

    #[test]
    fn test_is_separated_from() {
        let a = unit_box();
        let b = a.translated(Vec3::new(0.0, 0.0, 1.5));
        assert!(a.is_separated_from(&b, 0.4));
        assert!(!a.is_separated_from(&b, 0.5));
    }

    #[test]
    fn test_is_valid_rejects_nan_and_inverted() {
        assert!(unit_box().is_valid());
        let inverted = AxisAlignedBox::new(Point3::new(1.0, 0.0, 0.0), Point3::ORIGIN);
        assert!(!inverted.is_valid());
        let nan = AxisAlignedBox::from_point(Point3::new(f64::NAN, 0.0, 0.0));
        assert!(!nan.is_valid());
    }

    #[test]
    fn test_interval_parameter_at() {
        let i = Interval::new(2.0, 4.0);
        assert_eq!(i.parameter_at(0.0), 2.0);
        assert_eq!(i.parameter_at(0.5), 3.0);
        assert_eq!(i.parameter_at(1.0), 4.0);
        let r = Interval::new(4.0, 2.0);
        assert_eq!(r.parameter_at(0.25), 3.5);
        assert!(r.contains(3.0));
    }
}
