//! Host document collaborators.
//!
//! The engine never talks to a modeling document directly. It consumes four
//! narrow contracts:
//! - [`ObjectSource`]: which objects to check
//! - [`InputPrompt`]: the distance and angle tolerances
//! - [`GeometryProvider`]: raw geometry for each object handle
//! - [`SelectionSink`]: where the final duplicate selection goes
//!
//! [`SceneDocument`] implements the first and third over a JSON scene file,
//! [`TerminalPrompt`] / [`PresetPrompt`] cover prompting, and
//! [`SelectionFile`] / [`MemorySink`] receive the selection.

pub mod prompt;
pub mod scene;
pub mod selection;

use std::collections::BTreeSet;

use crate::duplicates::{EntityId, Kind};
use crate::geometry::{AxisAlignedBox, Brep, Curve, Extrusion, Point3, Transform};

pub use prompt::{PresetAnswer, PresetPrompt, TerminalPrompt};
pub use scene::{SceneDocument, SceneError};
pub use selection::{MemorySink, SelectionError, SelectionFile};

/// Geometry as resolved from the host, before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum HostGeometry {
    Point(Point3),
    Curve(Curve),
    Brep(Brep),
    /// Extrusion-like solids; normalized to a [`Brep`] by the classifier.
    Extrusion(Extrusion),
    /// A placed block reference. `definition_box` is the box of the
    /// definition's geometry in block-local coordinates.
    BlockInstance {
        name: String,
        transform: Transform,
        definition_box: AxisAlignedBox,
    },
}

impl HostGeometry {
    /// The record kind this geometry classifies as.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Point(_) => Kind::Point,
            Self::Curve(_) => Kind::Curve,
            Self::Brep(_) | Self::Extrusion(_) => Kind::SurfaceOrSolid,
            Self::BlockInstance { .. } => Kind::BlockInstance,
        }
    }
}

/// Supplies the set of objects to check.
pub trait ObjectSource {
    /// Object handles to check; an empty list means there is nothing to do.
    fn get_selection(&self) -> Vec<EntityId>;
}

/// Asks the user for a number.
pub trait InputPrompt {
    /// Ask for a real value in `[min, max]`, offering `default`.
    ///
    /// Returns `None` if the user cancels.
    fn get_real(&mut self, label: &str, default: f64, min: f64, max: Option<f64>) -> Option<f64>;
}

/// Resolves object handles to geometry.
pub trait GeometryProvider {
    /// Resolve one handle, or `None` if it cannot be resolved.
    fn resolve(&self, handle: EntityId) -> Option<HostGeometry>;
}

/// Receives the final duplicate selection.
pub trait SelectionSink {
    /// Replace the host's selection with `ids`. Called exactly once per run.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] if the selection cannot be applied.
    fn apply(&mut self, ids: &BTreeSet<EntityId>) -> Result<(), SelectionError>;
}
