//! JSON output formatter.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "message": "Selected 1 duplicate object(s) within the specified tolerances.",
//!   "duplicates": [
//!     { "id": 2, "representative": 1, "kind": "point" }
//!   ],
//!   "summary": {
//!     "selected": 3,
//!     "classified": 3,
//!     "candidate_pairs": 1,
//!     "duplicates": 1,
//!     "distance_tolerance": 0.01,
//!     "angle_tolerance_degrees": 1.0,
//!     "exit_code": 0,
//!     "exit_code_name": "GD000"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateSet, EntityId, Kind, RunSummary, Tolerances};
use crate::error::ExitCode;
use crate::report::Report;

/// One duplicate and the object it duplicates.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    pub id: EntityId,
    pub representative: EntityId,
    /// Omitted when the kind is not known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub selected: usize,
    pub classified: usize,
    pub unresolved: usize,
    pub without_box: usize,
    pub candidate_pairs: usize,
    pub compared_pairs: usize,
    pub skipped_pairs: usize,
    pub incomparable_pairs: usize,
    pub duplicates: usize,
    pub distance_tolerance: f64,
    pub angle_tolerance_degrees: f64,
    /// Wall time of all phases in milliseconds
    pub duration_ms: u64,
    pub exit_code: i32,
    /// Machine-readable exit code name (e.g., "GD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    #[must_use]
    pub fn from_run(summary: &RunSummary, tol: &Tolerances, exit_code: ExitCode) -> Self {
        Self {
            selected: summary.selected,
            classified: summary.classified,
            unresolved: summary.unresolved,
            without_box: summary.without_box,
            candidate_pairs: summary.candidate_pairs,
            compared_pairs: summary.compared_pairs,
            skipped_pairs: summary.skipped_pairs,
            incomparable_pairs: summary.incomparable_pairs,
            duplicates: summary.duplicates,
            distance_tolerance: tol.distance(),
            angle_tolerance_degrees: tol.angle_degrees(),
            duration_ms: summary.total_duration().as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub generated_at: DateTime<Utc>,
    pub message: String,
    pub duplicates: Vec<JsonDuplicate>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the output for one run. `kinds` supplies the kind of each id
    /// where known.
    #[must_use]
    pub fn new(
        set: &DuplicateSet,
        kinds: &BTreeMap<EntityId, Kind>,
        summary: &RunSummary,
        tol: &Tolerances,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            message: Report::from_run(set, summary).message(),
            duplicates: set
                .iter()
                .map(|(id, representative)| JsonDuplicate {
                    id,
                    representative,
                    kind: kinds.get(&id).copied(),
                })
                .collect(),
            summary: JsonSummary::from_run(summary, tol, exit_code),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)
    }
}
