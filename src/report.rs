//! Result reporting.
//!
//! A run ends with exactly one selection update and exactly one message.

use std::collections::BTreeSet;
use std::fmt;

use yansi::Paint;

use crate::duplicates::{DuplicateSet, EntityId, RunSummary};
use crate::host::{SelectionError, SelectionSink};

/// User-facing outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    duplicates: usize,
    considered: usize,
}

impl Report {
    #[must_use]
    pub fn from_run(set: &DuplicateSet, summary: &RunSummary) -> Self {
        Self {
            duplicates: set.len(),
            considered: summary.classified,
        }
    }

    /// Number of objects selected as duplicates.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    #[must_use]
    pub fn found_any(&self) -> bool {
        self.duplicates > 0
    }

    /// The single line shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        if self.duplicates == 0 {
            "No duplicates found within the specified tolerances.".to_string()
        } else {
            format!(
                "Selected {} duplicate object(s) within the specified tolerances.",
                self.duplicates
            )
        }
    }

    /// The message with terminal colors, honoring the global yansi switch.
    #[must_use]
    pub fn styled_message(&self) -> String {
        let message = self.message();
        if self.found_any() {
            message.yellow().bold().to_string()
        } else {
            message.green().to_string()
        }
    }

    /// Extra detail for verbose text output.
    #[must_use]
    pub fn detail(&self, set: &DuplicateSet) -> String {
        let mut out = format!(
            "{} of {} object(s) are duplicates",
            self.duplicates, self.considered
        );
        for (dup, rep) in set.iter() {
            out.push_str(&format!("\n  {} duplicates {}", dup.dim(), rep));
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Hand the final set to the sink, replacing its previous selection.
///
/// # Errors
///
/// Returns whatever the sink reports.
pub fn publish(set: &DuplicateSet, sink: &mut dyn SelectionSink) -> Result<(), SelectionError> {
    let ids: BTreeSet<EntityId> = set.ids();
    log::debug!("Publishing selection of {} id(s)", ids.len());
    sink.apply(&ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::{DedupEngine, EngineConfig, GeometryRecord, Payload, Tolerances};
    use crate::geometry::{AxisAlignedBox, Point3};
    use crate::host::MemorySink;

    fn run(xs: &[f64]) -> (DuplicateSet, RunSummary) {
        let records: Vec<GeometryRecord> = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let p = Point3::new(x, 0.0, 0.0);
                GeometryRecord::new(
                    EntityId(i as u64 + 1),
                    AxisAlignedBox::from_point(p),
                    Payload::Point(p),
                )
            })
            .collect();
        DedupEngine::new(EngineConfig::new(Tolerances::new(0.0, 0.0).unwrap()))
            .find_duplicates_in_records(&records)
    }

    #[test]
    fn test_message_none() {
        let (set, summary) = run(&[0.0, 1.0]);
        let report = Report::from_run(&set, &summary);
        assert!(!report.found_any());
        assert_eq!(
            report.message(),
            "No duplicates found within the specified tolerances."
        );
    }

    #[test]
    fn test_message_some() {
        let (set, summary) = run(&[0.0, 0.0, 0.0, 5.0]);
        let report = Report::from_run(&set, &summary);
        assert_eq!(report.duplicates(), 2);
        assert_eq!(
            report.to_string(),
            "Selected 2 duplicate object(s) within the specified tolerances."
        );
        assert!(report.detail(&set).starts_with("2 of 4 object(s)"));
    }

    #[test]
    fn test_publish_applies_once() {
        let (set, _) = run(&[0.0, 0.0]);
        let mut sink = MemorySink::new();
        publish(&set, &mut sink).unwrap();
        assert_eq!(sink.apply_count(), 1);
        assert_eq!(sink.current(), Some(&set.ids()));
    }
}
