//! Untrimmed face surfaces.
//!
//! A brep face is compared through its underlying surface, evaluated over the
//! full `(u, v)` domain. Trims are not modelled.

use serde::{Deserialize, Serialize};

use super::bbox::{AxisAlignedBox, Interval};
use super::curve::Curve;
use super::vector::{Point3, Vec3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "surface", rename_all = "snake_case")]
pub enum Surface {
    /// Rectangular plane patch: `origin + x_axis * u + y_axis * v`.
    Plane {
        origin: Point3,
        x_axis: Vec3,
        y_axis: Vec3,
        u: Interval,
        v: Interval,
    },
    /// A profile swept along a straight direction: `profile(u) + direction * v`.
    Extrusion {
        profile: Curve,
        direction: Vec3,
        #[serde(default = "unit_interval")]
        v: Interval,
    },
}

fn unit_interval() -> Interval {
    Interval::new(0.0, 1.0)
}

impl Surface {
    /// Plane patch with normalized axes.
    #[must_use]
    pub fn plane(origin: Point3, x_axis: Vec3, y_axis: Vec3, u: Interval, v: Interval) -> Self {
        Self::Plane {
            origin,
            x_axis: x_axis.normalize(),
            y_axis: y_axis.normalize(),
            u,
            v,
        }
    }

    #[must_use]
    pub fn extrusion(profile: Curve, direction: Vec3) -> Self {
        Self::Extrusion {
            profile,
            direction,
            v: unit_interval(),
        }
    }

    #[must_use]
    pub fn domain_u(&self) -> Interval {
        match self {
            Self::Plane { u, .. } => *u,
            Self::Extrusion { profile, .. } => profile.domain(),
        }
    }

    #[must_use]
    pub fn domain_v(&self) -> Interval {
        match self {
            Self::Plane { v, .. } | Self::Extrusion { v, .. } => *v,
        }
    }

    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> Point3 {
        match self {
            Self::Plane {
                origin,
                x_axis,
                y_axis,
                ..
            } => *origin + *x_axis * u + *y_axis * v,
            Self::Extrusion {
                profile, direction, ..
            } => profile.point_at(u) + *direction * v,
        }
    }

    /// Unit normal, or zero where the surface is degenerate.
    #[must_use]
    pub fn normal_at(&self, u: f64, _v: f64) -> Vec3 {
        match self {
            Self::Plane { x_axis, y_axis, .. } => x_axis.cross(y_axis).normalize(),
            Self::Extrusion {
                profile, direction, ..
            } => profile.tangent_at(u).cross(direction).normalize(),
        }
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<AxisAlignedBox> {
        match self {
            Self::Plane { u, v, .. } => AxisAlignedBox::from_points([
                self.point_at(u.t0, v.t0),
                self.point_at(u.t1, v.t0),
                self.point_at(u.t0, v.t1),
                self.point_at(u.t1, v.t1),
            ]),
            Self::Extrusion {
                profile,
                direction,
                v,
            } => {
                let base = profile.bounding_box()?;
                let start = base.translated(*direction * v.t0);
                let end = base.translated(*direction * v.t1);
                Some(start.union(&end))
            }
        }
    }
}
