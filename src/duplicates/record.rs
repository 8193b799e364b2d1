//! Core data model: entity ids, classified records and tolerances.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DedupError;
use crate::geometry::{AxisAlignedBox, Brep, Curve, Point3, Transform};

/// Stable identifier of one input object, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Geometry kind of a record. Only records of the same kind are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Point,
    Curve,
    SurfaceOrSolid,
    BlockInstance,
}

impl Kind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Curve => "curve",
            Self::SurfaceOrSolid => "surface_or_solid",
            Self::BlockInstance => "block_instance",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific geometry carried by a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Point(Point3),
    Curve(Curve),
    SurfaceOrSolid(Brep),
    /// Block instances are compared by definition name and placement only.
    BlockInstance { name: String, transform: Transform },
}

impl Payload {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Point(_) => Kind::Point,
            Self::Curve(_) => Kind::Curve,
            Self::SurfaceOrSolid(_) => Kind::SurfaceOrSolid,
            Self::BlockInstance { .. } => Kind::BlockInstance,
        }
    }
}

/// A classified input object ready for indexing and comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    pub id: EntityId,
    /// World-space box tightly fit to the geometry.
    pub bbox: AxisAlignedBox,
    pub payload: Payload,
}

impl GeometryRecord {
    #[must_use]
    pub fn new(id: EntityId, bbox: AxisAlignedBox, payload: Payload) -> Self {
        Self { id, bbox, payload }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.payload.kind()
    }
}

/// Distance and angle tolerances for one run.
///
/// Constructed once and passed by reference into every index query and
/// comparison; no component keeps its own copy of the values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    distance: f64,
    angle: f64,
}

impl Tolerances {
    /// Create tolerances from a distance in model units and an angle in radians.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::InvalidTolerance`] if `distance` is negative or
    /// not finite, or `angle` lies outside `[0, π]`.
    pub fn new(distance: f64, angle: f64) -> Result<Self, DedupError> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(DedupError::InvalidTolerance {
                name: "distance",
                value: distance,
            });
        }
        if !angle.is_finite() || !(0.0..=std::f64::consts::PI).contains(&angle) {
            return Err(DedupError::InvalidTolerance {
                name: "angle",
                value: angle,
            });
        }
        Ok(Self { distance, angle })
    }

    /// Create tolerances with the angle given in degrees.
    ///
    /// # Errors
    ///
    /// Same as [`Tolerances::new`]; the degree value must lie in `[0, 180]`.
    pub fn from_degrees(distance: f64, angle_degrees: f64) -> Result<Self, DedupError> {
        if !(0.0..=180.0).contains(&angle_degrees) {
            return Err(DedupError::InvalidTolerance {
                name: "angle",
                value: angle_degrees,
            });
        }
        Self::new(distance, angle_degrees.to_radians().min(std::f64::consts::PI))
    }

    /// Maximum positional deviation in model units.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Maximum angular deviation in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerances_accept_bounds() {
        assert!(Tolerances::new(0.0, 0.0).is_ok());
        assert!(Tolerances::new(10.0, std::f64::consts::PI).is_ok());
        let t = Tolerances::from_degrees(0.1, 180.0).unwrap();
        assert!((t.angle() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_tolerances_reject_out_of_range() {
        assert!(matches!(
            Tolerances::new(-0.1, 0.0),
            Err(DedupError::InvalidTolerance { name: "distance", .. })
        ));
        assert!(Tolerances::new(f64::NAN, 0.0).is_err());
        assert!(Tolerances::new(0.1, 4.0).is_err());
        assert!(Tolerances::from_degrees(0.1, 181.0).is_err());
        assert!(Tolerances::from_degrees(0.1, -1.0).is_err());
    }

    #[test]
    fn test_payload_kind() {
        let p = Payload::Point(Point3::ORIGIN);
        assert_eq!(p.kind(), Kind::Point);
        let b = Payload::BlockInstance {
            name: "Chair".into(),
            transform: Transform::identity(),
        };
        assert_eq!(b.kind(), Kind::BlockInstance);
        assert_eq!(Kind::SurfaceOrSolid.to_string(), "surface_or_solid");
    }

    #[test]
    fn test_entity_id_ordering_and_display() {
        assert!(EntityId(1) < EntityId(2));
        assert_eq!(EntityId(7).to_string(), "#7");
    }
}
