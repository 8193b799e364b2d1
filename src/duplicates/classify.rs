//! Geometry classification.
//!
//! Turns host handles into [`GeometryRecord`]s. Handles that cannot be
//! resolved, or whose geometry has no usable box, are left out of the record
//! set without raising an error.

use std::collections::HashSet;

use super::record::{EntityId, GeometryRecord, Payload};
use crate::geometry::AxisAlignedBox;
use crate::host::{GeometryProvider, HostGeometry};

/// Why a handle was left out of the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The provider could not resolve the handle.
    Unresolved,
    /// The geometry resolved but its box was empty, inverted or not finite.
    NoBoundingBox,
    /// The handle appeared earlier in the same selection.
    Repeated,
}

/// Classify one handle.
///
/// Block instances become `(name, transform)` payloads boxed by their placed
/// definition. Extrusions are converted to breps before boxing.
pub fn classify(handle: EntityId, provider: &dyn GeometryProvider) -> Result<GeometryRecord, Exclusion> {
    let geometry = provider.resolve(handle).ok_or(Exclusion::Unresolved)?;

    let (bbox, payload) = match geometry {
        HostGeometry::Point(location) => {
            (Some(AxisAlignedBox::from_point(location)), Payload::Point(location))
        }
        HostGeometry::Curve(curve) => (curve.bounding_box(), Payload::Curve(curve)),
        HostGeometry::Brep(brep) => (brep.bounding_box(), Payload::SurfaceOrSolid(brep)),
        HostGeometry::Extrusion(extrusion) => {
            let brep = extrusion.to_brep();
            (brep.bounding_box(), Payload::SurfaceOrSolid(brep))
        }
        HostGeometry::BlockInstance {
            name,
            transform,
            definition_box,
        } => (
            Some(transform.transform_box(&definition_box)),
            Payload::BlockInstance { name, transform },
        ),
    };

    match bbox {
        Some(bbox) if bbox.is_valid() => Ok(GeometryRecord::new(handle, bbox, payload)),
        _ => Err(Exclusion::NoBoundingBox),
    }
}

/// Result of classifying a whole selection.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    /// Records in selection order.
    pub records: Vec<GeometryRecord>,
    /// Handles left out, with the reason.
    pub excluded: Vec<(EntityId, Exclusion)>,
}

/// Classify every handle in `selection`, keeping the first occurrence of each id.
pub fn classify_all(selection: &[EntityId], provider: &dyn GeometryProvider) -> Classified {
    classify_all_with(selection, provider, |_, _| {})
}

/// Like [`classify_all`], calling `on_handle(done, handle)` after each handle.
pub fn classify_all_with<F>(
    selection: &[EntityId],
    provider: &dyn GeometryProvider,
    mut on_handle: F,
) -> Classified
where
    F: FnMut(usize, EntityId),
{
    let mut seen = HashSet::with_capacity(selection.len());
    let mut out = Classified::default();

    for (i, &handle) in selection.iter().enumerate() {
        if !seen.insert(handle) {
            out.excluded.push((handle, Exclusion::Repeated));
        } else {
            match classify(handle, provider) {
                Ok(record) => {
                    log::trace!("Classified {} as {}", handle, record.kind());
                    out.records.push(record);
                }
                Err(reason) => {
                    log::debug!("Excluding {}: {:?}", handle, reason);
                    out.excluded.push((handle, reason));
                }
            }
        }
        on_handle(i + 1, handle);
    }

    out
}
