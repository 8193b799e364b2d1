//! Placement transforms for block instances.

use serde::{Deserialize, Serialize};

use super::bbox::AxisAlignedBox;
use super::vector::{Point3, Vec3};

/// A 4x4 affine transform stored row-major, so `m[r][c]` is `M{r}{c}`.
///
/// The translation lives in the last column (`M03`, `M13`, `M23`), which
/// matches how host documents report block placements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transform {
    pub m: [[f64; 4]; 4],
}

impl Transform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    #[must_use]
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut t = Self::identity();
        t.m[0][3] = dx;
        t.m[1][3] = dy;
        t.m[2][3] = dz;
        t
    }

    /// Counter-clockwise rotation about the world Z axis by `angle` radians.
    #[must_use]
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut t = Self::identity();
        t.m[0][0] = c;
        t.m[0][1] = -s;
        t.m[1][0] = s;
        t.m[1][1] = c;
        t
    }

    /// `self * other`: applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[r][k] * other.m[k][c]).sum();
            }
        }
        Self { m: out }
    }

    /// Origin of the placed instance.
    #[must_use]
    pub fn translation_part(&self) -> Point3 {
        Point3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Image of the local X axis; used as the instance's orientation.
    #[must_use]
    pub fn primary_axis(&self) -> Vec3 {
        Vec3::new(self.m[0][0], self.m[1][0], self.m[2][0])
    }

    #[must_use]
    pub fn transform_point(&self, p: Point3) -> Point3 {
        let m = &self.m;
        let x = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let y = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let z = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if w != 0.0 && w != 1.0 {
            Point3::new(x / w, y / w, z / w)
        } else {
            Point3::new(x, y, z)
        }
    }

    /// World box of a transformed box: the AABB of its mapped corners.
    #[must_use]
    pub fn transform_box(&self, b: &AxisAlignedBox) -> AxisAlignedBox {
        let corners = b.corners().map(|c| self.transform_point(c));
        let mut out = AxisAlignedBox::from_point(corners[0]);
        for c in &corners[1..] {
            out = out.including(*c);
        }
        out
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
