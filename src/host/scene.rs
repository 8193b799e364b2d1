//! JSON scene files standing in for a host modeling document.
//!
//! # Format
//!
//! ```json
//! {
//!   "absolute_tolerance": 0.001,
//!   "selection": [1, 2],
//!   "definitions": [
//!     { "name": "Chair", "objects": [ { "type": "point", "location": [0, 0, 0] } ] }
//!   ],
//!   "objects": [
//!     { "id": 1, "geometry": { "type": "point", "location": [0, 0, 0] } },
//!     { "id": 2, "geometry": { "type": "block_instance", "name": "Chair",
//!                              "transform": [[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]] } }
//!   ]
//! }
//! ```
//!
//! `selection` is optional; without it every object is selected.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{GeometryProvider, HostGeometry, ObjectSource};
use crate::duplicates::EntityId;
use crate::geometry::{AxisAlignedBox, Brep, Curve, Extrusion, Point3, Surface, Transform, Vec3};

/// Nesting depth past which block definitions are not expanded for boxes.
const MAX_BLOCK_DEPTH: usize = 8;

/// Errors that can occur while loading a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The scene file could not be read.
    #[error("Failed to read scene {path}: {source}")]
    Io {
        /// Path of the scene file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The scene file is not valid scene JSON.
    #[error("Invalid scene JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two objects share an id.
    #[error("Duplicate object id {0} in scene")]
    DuplicateId(EntityId),
}

/// Geometry as written in a scene file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneGeometry {
    Point {
        location: Point3,
    },
    Curve {
        curve: Curve,
    },
    Brep {
        faces: Vec<Surface>,
    },
    Extrusion {
        profile: Curve,
        direction: Vec3,
        #[serde(default)]
        capped: bool,
    },
    BlockInstance {
        name: String,
        transform: Transform,
    },
    /// Anything the engine cannot compare (text, dimensions, meshes...).
    Unsupported {
        #[serde(default)]
        description: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct SceneObject {
    id: EntityId,
    geometry: SceneGeometry,
}

#[derive(Debug, Clone, Deserialize)]
struct BlockDefinition {
    name: String,
    #[serde(default)]
    objects: Vec<SceneGeometry>,
}

fn default_absolute_tolerance() -> f64 {
    0.001
}

#[derive(Debug, Clone, Deserialize)]
struct SceneFile {
    #[serde(default = "default_absolute_tolerance")]
    absolute_tolerance: f64,
    #[serde(default)]
    selection: Option<Vec<EntityId>>,
    #[serde(default)]
    definitions: Vec<BlockDefinition>,
    #[serde(default)]
    objects: Vec<SceneObject>,
}

/// A loaded scene: the object table plus block definitions.
#[derive(Debug, Clone)]
pub struct SceneDocument {
    name: String,
    absolute_tolerance: f64,
    selection: Vec<EntityId>,
    objects: HashMap<EntityId, SceneGeometry>,
    definitions: HashMap<String, Vec<SceneGeometry>>,
}

impl SceneDocument {
    /// Load a scene from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError`] if the file cannot be read or parsed, or if two
    /// objects share an id.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc = Self::from_json(&content)?;
        doc.name = path.display().to_string();
        Ok(doc)
    }

    /// Parse a scene from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError`] on invalid JSON or duplicate object ids.
    pub fn from_json(content: &str) -> Result<Self, SceneError> {
        let file: SceneFile = serde_json::from_str(content)?;

        let mut objects = HashMap::with_capacity(file.objects.len());
        let mut order = Vec::with_capacity(file.objects.len());
        for obj in file.objects {
            if objects.insert(obj.id, obj.geometry).is_some() {
                return Err(SceneError::DuplicateId(obj.id));
            }
            order.push(obj.id);
        }

        let definitions = file
            .definitions
            .into_iter()
            .map(|d| (d.name, d.objects))
            .collect();

        log::debug!(
            "Loaded scene with {} objects, absolute tolerance {}",
            objects.len(),
            file.absolute_tolerance
        );

        Ok(Self {
            name: String::from("<memory>"),
            absolute_tolerance: file.absolute_tolerance,
            selection: file.selection.unwrap_or(order),
            objects,
            definitions,
        })
    }

    /// Replace the scene's selection.
    #[must_use]
    pub fn with_selection(mut self, ids: Vec<EntityId>) -> Self {
        self.selection = ids;
        self
    }

    /// Where the scene came from, for reports.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The document's model tolerance, offered as the default distance tolerance.
    #[must_use]
    pub fn absolute_tolerance(&self) -> f64 {
        self.absolute_tolerance
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Box of a block definition in block-local coordinates.
    fn definition_box(&self, name: &str, depth: usize) -> Option<AxisAlignedBox> {
        if depth > MAX_BLOCK_DEPTH {
            log::debug!("Block '{}' nested deeper than {}", name, MAX_BLOCK_DEPTH);
            return None;
        }
        let members = self.definitions.get(name)?;
        members
            .iter()
            .filter_map(|g| self.local_box(g, depth))
            .reduce(|acc, b| acc.union(&b))
    }

    fn local_box(&self, geometry: &SceneGeometry, depth: usize) -> Option<AxisAlignedBox> {
        match geometry {
            SceneGeometry::Point { location } => Some(AxisAlignedBox::from_point(*location)),
            SceneGeometry::Curve { curve } => curve.bounding_box(),
            SceneGeometry::Brep { faces } => Brep::new(faces.clone()).bounding_box(),
            SceneGeometry::Extrusion {
                profile,
                direction,
                capped,
            } => Extrusion {
                profile: profile.clone(),
                direction: *direction,
                capped: *capped,
            }
            .to_brep()
            .bounding_box(),
            SceneGeometry::BlockInstance { name, transform } => self
                .definition_box(name, depth + 1)
                .map(|b| transform.transform_box(&b)),
            SceneGeometry::Unsupported { .. } => None,
        }
    }
}

impl ObjectSource for SceneDocument {
    fn get_selection(&self) -> Vec<EntityId> {
        self.selection.clone()
    }
}

impl GeometryProvider for SceneDocument {
    fn resolve(&self, handle: EntityId) -> Option<HostGeometry> {
        let geometry = self.objects.get(&handle)?;
        match geometry {
            SceneGeometry::Point { location } => Some(HostGeometry::Point(*location)),
            SceneGeometry::Curve { curve } => Some(HostGeometry::Curve(curve.clone())),
            SceneGeometry::Brep { faces } => Some(HostGeometry::Brep(Brep::new(faces.clone()))),
            SceneGeometry::Extrusion {
                profile,
                direction,
                capped,
            } => Some(HostGeometry::Extrusion(Extrusion {
                profile: profile.clone(),
                direction: *direction,
                capped: *capped,
            })),
            SceneGeometry::BlockInstance { name, transform } => {
                let definition_box = self.definition_box(name, 0)?;
                Some(HostGeometry::BlockInstance {
                    name: name.clone(),
                    transform: *transform,
                    definition_box,
                })
            }
            SceneGeometry::Unsupported { description } => {
                log::trace!("Object {} is unsupported: {}", handle, description);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "absolute_tolerance": 0.01,
        "definitions": [
            { "name": "Chair", "objects": [
                { "type": "point", "location": [0, 0, 0] },
                { "type": "point", "location": [1, 2, 3] }
            ] }
        ],
        "objects": [
            { "id": 1, "geometry": { "type": "point", "location": [0, 0, 0] } },
            { "id": 2, "geometry": { "type": "block_instance", "name": "Chair",
              "transform": [[1,0,0,10],[0,1,0,0],[0,0,1,0],[0,0,0,1]] } },
            { "id": 3, "geometry": { "type": "block_instance", "name": "Missing",
              "transform": [[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]] } },
            { "id": 4, "geometry": { "type": "unsupported", "description": "text dot" } }
        ]
    }"#;

    #[test]
    fn test_default_selection_is_all_objects_in_order() {
        let doc = SceneDocument::from_json(SCENE).unwrap();
        let ids: Vec<u64> = doc.get_selection().iter().map(|id| id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(doc.absolute_tolerance(), 0.01);
    }

    #[test]
    fn test_resolve_block_instance_box() {
        let doc = SceneDocument::from_json(SCENE).unwrap();
        match doc.resolve(EntityId(2)) {
            Some(HostGeometry::BlockInstance {
                name,
                definition_box,
                ..
            }) => {
                assert_eq!(name, "Chair");
                assert_eq!(definition_box.max, Point3::new(1.0, 2.0, 3.0));
            }
            other => panic!("Expected block instance, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_handles() {
        let doc = SceneDocument::from_json(SCENE).unwrap();
        assert!(doc.resolve(EntityId(3)).is_none());
        assert!(doc.resolve(EntityId(4)).is_none());
        assert!(doc.resolve(EntityId(99)).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"objects": [
            { "id": 1, "geometry": { "type": "point", "location": [0, 0, 0] } },
            { "id": 1, "geometry": { "type": "point", "location": [1, 0, 0] } }
        ]}"#;
        assert!(matches!(
            SceneDocument::from_json(json),
            Err(SceneError::DuplicateId(EntityId(1)))
        ));
    }

    #[test]
    fn test_explicit_selection_and_defaults() {
        let json = r#"{"selection": [2], "objects": [
            { "id": 1, "geometry": { "type": "point", "location": [0, 0, 0] } },
            { "id": 2, "geometry": { "type": "point", "location": [1, 0, 0] } }
        ]}"#;
        let doc = SceneDocument::from_json(json).unwrap();
        assert_eq!(doc.get_selection(), vec![EntityId(2)]);
        assert_eq!(doc.absolute_tolerance(), 0.001);
        let doc = doc.with_selection(vec![EntityId(1), EntityId(2)]);
        assert_eq!(doc.get_selection().len(), 2);
    }

    #[test]
    fn test_self_referencing_block_does_not_loop() {
        let json = r#"{
            "definitions": [ { "name": "Loop", "objects": [
                { "type": "block_instance", "name": "Loop",
                  "transform": [[1,0,0,1],[0,1,0,0],[0,0,1,0],[0,0,0,1]] }
            ] } ],
            "objects": [ { "id": 1, "geometry": { "type": "block_instance", "name": "Loop",
                "transform": [[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]] } } ]
        }"#;
        let doc = SceneDocument::from_json(json).unwrap();
        assert!(doc.resolve(EntityId(1)).is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneDocument::load(Path::new("/no/such/scene.json")).unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }
}
