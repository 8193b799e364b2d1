//! Selection sinks.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::SelectionSink;
use crate::duplicates::EntityId;

/// Errors that can occur while applying a selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Writing the selection failed.
    #[error("Failed to write selection to {path}: {source}")]
    Write {
        /// Destination of the selection
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The selection could not be serialized.
    #[error("Failed to serialize selection: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The sink was applied more than once in one run.
    #[error("Selection was already applied")]
    AlreadyApplied,
}

/// Selection state as persisted by [`SelectionFile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSelection {
    /// When the selection was written.
    pub created_at: DateTime<Utc>,
    /// The scene the ids refer to.
    pub scene: String,
    /// Selected object ids in ascending order.
    pub selected: Vec<EntityId>,
}

/// Writes the selection as JSON, replacing any previous selection file.
#[derive(Debug, Clone)]
pub struct SelectionFile {
    path: PathBuf,
    scene: String,
    applied: bool,
}

impl SelectionFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, scene: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            scene: scene.into(),
            applied: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back a selection written by this sink.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or is not a saved selection.
    pub fn read(path: &Path) -> anyhow::Result<SavedSelection> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read selection file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid selection file: {}", path.display()))
    }

    fn write(&self, ids: &BTreeSet<EntityId>) -> Result<(), SelectionError> {
        let saved = SavedSelection {
            created_at: Utc::now(),
            scene: self.scene.clone(),
            selected: ids.iter().copied().collect(),
        };
        let json = serde_json::to_string_pretty(&saved)?;
        let io_err = |source| SelectionError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

impl SelectionSink for SelectionFile {
    fn apply(&mut self, ids: &BTreeSet<EntityId>) -> Result<(), SelectionError> {
        if self.applied {
            return Err(SelectionError::AlreadyApplied);
        }
        self.write(ids)?;
        self.applied = true;
        log::info!("Wrote {} selected id(s) to {}", ids.len(), self.path.display());
        Ok(())
    }
}

/// Records every applied selection in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    applied: Vec<BTreeSet<EntityId>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the sink was applied.
    #[must_use]
    pub fn apply_count(&self) -> usize {
        self.applied.len()
    }

    /// The most recently applied selection.
    #[must_use]
    pub fn current(&self) -> Option<&BTreeSet<EntityId>> {
        self.applied.last()
    }
}

impl SelectionSink for MemorySink {
    fn apply(&mut self, ids: &BTreeSet<EntityId>) -> Result<(), SelectionError> {
        self.applied.push(ids.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ids(raw: &[u64]) -> BTreeSet<EntityId> {
        raw.iter().copied().map(EntityId).collect()
    }

    #[test]
    fn test_selection_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("selection.json");
        let mut sink = SelectionFile::new(&path, "scene.json");
        sink.apply(&ids(&[3, 1])).unwrap();

        let saved = SelectionFile::read(&path).unwrap();
        assert_eq!(saved.scene, "scene.json");
        assert_eq!(saved.selected, vec![EntityId(1), EntityId(3)]);
    }

    #[test]
    fn test_selection_file_replaces_previous_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("selection.json");
        SelectionFile::new(&path, "a").apply(&ids(&[1, 2, 3])).unwrap();
        SelectionFile::new(&path, "a").apply(&ids(&[])).unwrap();
        assert!(SelectionFile::read(&path).unwrap().selected.is_empty());
    }

    #[test]
    fn test_selection_file_applies_once() {
        let dir = tempdir().unwrap();
        let mut sink = SelectionFile::new(dir.path().join("s.json"), "a");
        sink.apply(&ids(&[1])).unwrap();
        assert!(matches!(
            sink.apply(&ids(&[2])),
            Err(SelectionError::AlreadyApplied)
        ));
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        assert!(sink.current().is_none());
        sink.apply(&ids(&[5])).unwrap();
        assert_eq!(sink.apply_count(), 1);
        assert_eq!(sink.current(), Some(&ids(&[5])));
    }
}
