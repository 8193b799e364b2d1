//! Boundary representations and extrusion solids.

use serde::{Deserialize, Serialize};

use super::bbox::{AxisAlignedBox, Interval};
use super::curve::Curve;
use super::surface::Surface;
use super::vector::Vec3;

/// A surface or solid body as an ordered list of faces.
///
/// Face order is significant: bodies are compared face-by-face by index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Brep {
    pub faces: Vec<Surface>,
}

impl Brep {
    #[must_use]
    pub fn new(faces: Vec<Surface>) -> Self {
        Self { faces }
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Union of face boxes; `None` for a body without usable faces.
    #[must_use]
    pub fn bounding_box(&self) -> Option<AxisAlignedBox> {
        let mut boxes = self.faces.iter().map(Surface::bounding_box);
        let first = boxes.next()??;
        boxes.try_fold(first, |acc, b| Some(acc.union(&b?)))
    }
}

/// A profile curve swept along a straight direction, optionally capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extrusion {
    pub profile: Curve,
    pub direction: Vec3,
    #[serde(default)]
    pub capped: bool,
}

impl Extrusion {
    /// Convert to a boundary representation.
    ///
    /// Face order is the side wall, then the start cap and end cap when the
    /// extrusion is capped and its profile spans a plane. Caps are plane
    /// patches covering the profile's extent in its own plane.
    #[must_use]
    pub fn to_brep(&self) -> Brep {
        let mut faces = vec![Surface::extrusion(self.profile.clone(), self.direction)];
        if self.capped {
            if let Some((origin, x_axis, y_axis)) = self.profile.plane_frame() {
                let (u0, u1) = self.profile.extent_along(origin, x_axis);
                let (v0, v1) = self.profile.extent_along(origin, y_axis);
                let u = Interval::new(u0, u1);
                let v = Interval::new(v0, v1);
                faces.push(Surface::plane(origin, x_axis, y_axis, u, v));
                faces.push(Surface::plane(origin + self.direction, x_axis, y_axis, u, v));
            }
        }
        Brep::new(faces)
    }
}
