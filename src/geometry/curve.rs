//! Parametric curves.
//!
//! Every curve is evaluated through its own parameter domain. Comparisons map
//! normalized fractions through [`Curve::domain`], so two curves only line up
//! sample-for-sample when they share direction and parametrization speed.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::bbox::{AxisAlignedBox, Interval};
use super::vector::{Point3, Vec3};

/// Curve kinds understood by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Curve {
    /// Straight segment, domain `[0, length]`.
    Line { from: Point3, to: Point3 },
    /// Connected segments, domain `[0, segment_count]`.
    Polyline { points: Vec<Point3> },
    /// Circular arc, domain `[start_angle, end_angle]` in radians.
    Arc {
        center: Point3,
        normal: Vec3,
        x_axis: Vec3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

impl Curve {
    #[must_use]
    pub fn line(from: Point3, to: Point3) -> Self {
        Self::Line { from, to }
    }

    #[must_use]
    pub fn polyline(points: Vec<Point3>) -> Self {
        Self::Polyline { points }
    }

    /// Arc in the plane through `center` with the given `normal`.
    /// The reference direction is projected into that plane.
    #[must_use]
    pub fn arc(center: Point3, normal: Vec3, x_axis: Vec3, radius: f64, span: Interval) -> Self {
        let n = normal.normalize();
        let x = (x_axis - n * x_axis.dot(&n)).normalize();
        Self::Arc {
            center,
            normal: n,
            x_axis: x,
            radius,
            start_angle: span.t0,
            end_angle: span.t1,
        }
    }

    #[must_use]
    pub fn domain(&self) -> Interval {
        match self {
            Self::Line { from, to } => Interval::new(0.0, from.distance_to(to)),
            Self::Polyline { points } => {
                Interval::new(0.0, points.len().saturating_sub(1) as f64)
            }
            Self::Arc {
                start_angle,
                end_angle,
                ..
            } => Interval::new(*start_angle, *end_angle),
        }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        match self {
            Self::Line { from, to } => {
                let len = from.distance_to(to);
                if len <= f64::EPSILON {
                    *from
                } else {
                    *from + (*to - *from) * (t / len)
                }
            }
            Self::Polyline { points } => match points.len() {
                0 => Point3::ORIGIN,
                1 => points[0],
                n => {
                    let (i, frac) = segment_at(t, n - 1);
                    points[i] + (points[i + 1] - points[i]) * frac
                }
            },
            Self::Arc {
                center,
                normal,
                x_axis,
                radius,
                ..
            } => {
                let y_axis = normal.cross(x_axis);
                *center + *x_axis * (radius * t.cos()) + y_axis * (radius * t.sin())
            }
        }
    }

    /// Unit tangent at `t`, or zero where the curve has no direction.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vec3 {
        match self {
            Self::Line { from, to } => (*to - *from).normalize(),
            Self::Polyline { points } => {
                if points.len() < 2 {
                    return Vec3::ZERO;
                }
                let (i, _) = segment_at(t, points.len() - 1);
                (points[i + 1] - points[i]).normalize()
            }
            Self::Arc {
                normal,
                x_axis,
                radius,
                ..
            } => {
                let y_axis = normal.cross(x_axis);
                (*x_axis * (-radius * t.sin()) + y_axis * (radius * t.cos())).normalize()
            }
        }
    }

    /// Exact `(min, max)` of `dot(p - origin, dir)` over every point of the curve.
    #[must_use]
    pub fn extent_along(&self, origin: Point3, dir: Vec3) -> (f64, f64) {
        let project = |p: Point3| (p - origin).dot(&dir);
        match self {
            Self::Line { from, to } => min_max([project(*from), project(*to)]),
            Self::Polyline { points } => min_max(points.iter().map(|p| project(*p))),
            Self::Arc {
                center,
                normal,
                x_axis,
                radius,
                start_angle,
                end_angle,
            } => {
                let y_axis = normal.cross(x_axis);
                let a = x_axis.dot(&dir) * radius;
                let b = y_axis.dot(&dir) * radius;
                let base = project(*center);
                // f(t) = base + a cos t + b sin t peaks at atan2(b, a) and its antipode.
                let peak = b.atan2(a);
                let span = Interval::new(*start_angle, *end_angle);
                let values = [*start_angle, *end_angle, peak, peak + std::f64::consts::PI]
                    .into_iter()
                    .enumerate()
                    .filter(|(i, t)| *i < 2 || angle_in_span(*t, &span))
                    .map(|(_, t)| base + a * t.cos() + b * t.sin());
                min_max(values)
            }
        }
    }

    /// Tight world-space box, or `None` for a polyline without points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<AxisAlignedBox> {
        if let Self::Polyline { points } = self {
            if points.is_empty() {
                return None;
            }
        }
        let (x0, x1) = self.extent_along(Point3::ORIGIN, Vec3::X);
        let (y0, y1) = self.extent_along(Point3::ORIGIN, Vec3::Y);
        let (z0, z1) = self.extent_along(Point3::ORIGIN, Vec3::Z);
        Some(AxisAlignedBox::new(
            Point3::new(x0, y0, z0),
            Point3::new(x1, y1, z1),
        ))
    }

    /// Plane the curve lies in as `(origin, x_axis, y_axis)`, if it spans one.
    ///
    /// Lines and collinear polylines have no unique plane.
    #[must_use]
    pub fn plane_frame(&self) -> Option<(Point3, Vec3, Vec3)> {
        match self {
            Self::Line { .. } => None,
            Self::Polyline { points } => {
                let origin = *points.first()?;
                // Newell's method tolerates non-convex and slightly non-planar outlines.
                let mut normal = Vec3::ZERO;
                for (i, p) in points.iter().enumerate() {
                    let q = points[(i + 1) % points.len()];
                    normal = normal
                        + Vec3::new(
                            (p.y - q.y) * (p.z + q.z),
                            (p.z - q.z) * (p.x + q.x),
                            (p.x - q.x) * (p.y + q.y),
                        );
                }
                let normal = normal.normalize();
                if normal == Vec3::ZERO {
                    return None;
                }
                let x = points
                    .windows(2)
                    .map(|w| (w[1] - w[0]).normalize())
                    .find(|d| *d != Vec3::ZERO)?;
                Some((origin, x, normal.cross(&x)))
            }
            Self::Arc {
                center,
                normal,
                x_axis,
                ..
            } => Some((*center, *x_axis, normal.cross(x_axis))),
        }
    }

    #[must_use]
    pub fn translated(&self, v: Vec3) -> Self {
        match self {
            Self::Line { from, to } => Self::Line {
                from: *from + v,
                to: *to + v,
            },
            Self::Polyline { points } => Self::Polyline {
                points: points.iter().map(|p| *p + v).collect(),
            },
            Self::Arc {
                center,
                normal,
                x_axis,
                radius,
                start_angle,
                end_angle,
            } => Self::Arc {
                center: *center + v,
                normal: *normal,
                x_axis: *x_axis,
                radius: *radius,
                start_angle: *start_angle,
                end_angle: *end_angle,
            },
        }
    }
}

/// Segment index and local fraction for polyline parameter `t`.
fn segment_at(t: f64, segments: usize) -> (usize, f64) {
    let t = t.clamp(0.0, segments as f64);
    let i = (t.floor() as usize).min(segments - 1);
    (i, t - i as f64)
}

fn angle_in_span(theta: f64, span: &Interval) -> bool {
    let lo = span.t0.min(span.t1);
    let hi = span.t0.max(span.t1);
    if hi - lo >= TAU {
        return true;
    }
    lo + (theta - lo).rem_euclid(TAU) <= hi
}

fn min_max<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}
