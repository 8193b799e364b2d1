//! Geometry model for the entities being deduplicated.
//!
//! This module provides:
//! - [`Point3`] / [`Vec3`] with distance and angle measures
//! - [`AxisAlignedBox`] and parameter [`Interval`]s
//! - [`Transform`] for block instance placements
//! - [`Curve`], [`Surface`], [`Brep`] and [`Extrusion`]

pub mod bbox;
pub mod body;
pub mod curve;
pub mod surface;
pub mod transform;
pub mod vector;

pub use bbox::{AxisAlignedBox, Interval};
pub use body::{Brep, Extrusion};
pub use curve::Curve;
pub use surface::Surface;
pub use transform::Transform;
pub use vector::{Point3, Vec3};
