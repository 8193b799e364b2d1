//! Narrow-phase deviation comparator.
//!
//! Each same-kind pair is routed to an estimator that measures how far the
//! two geometries differ under sampling. Block instances are judged directly
//! from their placement. Every other combination is incomparable and never a
//! duplicate.

use super::record::{GeometryRecord, Payload, Tolerances};
use crate::geometry::{AxisAlignedBox, Brep, Curve, Point3, Surface, Transform};

/// Sampling intervals along a curve domain (21 samples).
pub const CURVE_SAMPLES: usize = 20;

/// Sampling intervals along each face direction (a 6x6 grid).
pub const FACE_SAMPLES: usize = 5;

/// Maximum positional and angular difference found while sampling a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    /// Largest point-to-point distance, in model units.
    pub distance: f64,
    /// Largest direction difference, in radians.
    pub angle: f64,
}

impl Deviation {
    /// No difference at all.
    pub const ZERO: Self = Self {
        distance: 0.0,
        angle: 0.0,
    };

    /// Certainly not a duplicate.
    pub const INFINITE: Self = Self {
        distance: f64::INFINITY,
        angle: f64::INFINITY,
    };

    /// Both bounds are inclusive.
    #[must_use]
    pub fn within(&self, tol: &Tolerances) -> bool {
        self.distance <= tol.distance() && self.angle <= tol.angle()
    }

    fn absorb(&mut self, distance: f64, angle: f64) {
        self.distance = self.distance.max(distance);
        self.angle = self.angle.max(angle);
    }
}

/// Outcome of comparing one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Sampled deviation, to be checked against the tolerances.
    Deviation(Deviation),
    /// Direct placement decision for two block instances.
    Block(bool),
    /// Kinds differ; never a duplicate.
    Incomparable,
}

impl Verdict {
    #[must_use]
    pub fn is_duplicate(&self, tol: &Tolerances) -> bool {
        match self {
            Self::Deviation(d) => d.within(tol),
            Self::Block(same) => *same,
            Self::Incomparable => false,
        }
    }
}

/// Compare two records under `tol`.
///
/// The result does not depend on argument order.
#[must_use]
pub fn compare(a: &GeometryRecord, b: &GeometryRecord, tol: &Tolerances) -> Verdict {
    match (&a.payload, &b.payload) {
        (Payload::Point(p), Payload::Point(q)) => Verdict::Deviation(point_deviation(p, q)),
        (Payload::Curve(c), Payload::Curve(d)) => Verdict::Deviation(curve_deviation(c, d)),
        (Payload::SurfaceOrSolid(x), Payload::SurfaceOrSolid(y)) => {
            Verdict::Deviation(brep_deviation(x, &a.bbox, y, &b.bbox, tol))
        }
        (
            Payload::BlockInstance {
                name: n1,
                transform: t1,
            },
            Payload::BlockInstance {
                name: n2,
                transform: t2,
            },
        ) => Verdict::Block(same_block(n1, t1, n2, t2, tol)),
        (Payload::Point(_), _)
        | (Payload::Curve(_), _)
        | (Payload::SurfaceOrSolid(_), _)
        | (Payload::BlockInstance { .. }, _) => Verdict::Incomparable,
    }
}

/// Center-to-center distance; points carry no direction.
#[must_use]
pub fn point_deviation(p: &Point3, q: &Point3) -> Deviation {
    Deviation {
        distance: p.distance_to(q),
        angle: 0.0,
    }
}

/// Sample both curves at the same normalized fractions of their own domains.
#[must_use]
pub fn curve_deviation(c: &Curve, d: &Curve) -> Deviation {
    let (dc, dd) = (c.domain(), d.domain());
    let mut dev = Deviation::ZERO;
    for i in 0..=CURVE_SAMPLES {
        let f = i as f64 / CURVE_SAMPLES as f64;
        let (s, t) = (dc.parameter_at(f), dd.parameter_at(f));
        let distance = c.point_at(s).distance_to(&d.point_at(t));
        let angle = c.tangent_at(s).angle_to(&d.tangent_at(t));
        dev.absorb(distance, angle);
    }
    dev
}

/// Compare faces index by index on a sampling grid.
///
/// Bodies whose boxes are farther apart than the distance tolerance, or
/// whose face counts differ, are reported as [`Deviation::INFINITE`].
#[must_use]
pub fn brep_deviation(
    x: &Brep,
    x_box: &AxisAlignedBox,
    y: &Brep,
    y_box: &AxisAlignedBox,
    tol: &Tolerances,
) -> Deviation {
    if x_box.is_separated_from(y_box, tol.distance()) {
        return Deviation::INFINITE;
    }
    if x.face_count() != y.face_count() {
        log::trace!(
            "Face count mismatch ({} vs {})",
            x.face_count(),
            y.face_count()
        );
        return Deviation::INFINITE;
    }

    let mut dev = Deviation::ZERO;
    for (f, g) in x.faces.iter().zip(&y.faces) {
        face_deviation(f, g, &mut dev);
    }
    dev
}

fn face_deviation(f: &Surface, g: &Surface, dev: &mut Deviation) {
    let (fu, fv) = (f.domain_u(), f.domain_v());
    let (gu, gv) = (g.domain_u(), g.domain_v());
    for j in 0..=FACE_SAMPLES {
        let s = j as f64 / FACE_SAMPLES as f64;
        for k in 0..=FACE_SAMPLES {
            let t = k as f64 / FACE_SAMPLES as f64;
            let (u1, v1) = (fu.parameter_at(s), fv.parameter_at(t));
            let (u2, v2) = (gu.parameter_at(s), gv.parameter_at(t));
            let distance = f.point_at(u1, v1).distance_to(&g.point_at(u2, v2));
            let angle = f.normal_at(u1, v1).angle_to(&g.normal_at(u2, v2));
            dev.absorb(distance, angle);
        }
    }
}

/// Same definition, nearby insertion point, and matching primary axis.
#[must_use]
pub fn same_block(n1: &str, t1: &Transform, n2: &str, t2: &Transform, tol: &Tolerances) -> bool {
    n1 == n2
        && t1.translation_part().distance_to(&t2.translation_part()) <= tol.distance()
        && t1.primary_axis().angle_to(&t2.primary_axis()) <= tol.angle()
}
