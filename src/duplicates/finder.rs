//! Deduplication pipeline orchestration.
//!
//! # Overview
//!
//! [`DedupEngine`] runs the phases in order over one snapshot of the input:
//! 1. **Classify** - resolve handles into [`GeometryRecord`]s
//! 2. **Index** - bulk-load the record boxes into a [`SpatialIndex`]
//! 3. **Candidates** - collect pairs whose expanded boxes intersect
//! 4. **Compare** - greedily resolve candidates into a [`DuplicateSet`]
//!
//! # Example
//!
//! ```no_run
//! use geodupe::duplicates::{DedupEngine, EngineConfig, Tolerances};
//! use geodupe::host::{ObjectSource, SceneDocument};
//! use std::path::Path;
//!
//! let scene = SceneDocument::load(Path::new("scene.json")).unwrap();
//! let tolerances = Tolerances::from_degrees(0.01, 1.0).unwrap();
//! let engine = DedupEngine::new(EngineConfig::new(tolerances));
//!
//! let (duplicates, summary) = engine.find_duplicates(&scene.get_selection(), &scene);
//! println!("{} duplicates among {} objects", duplicates.len(), summary.selected);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::candidates::{self, CandidateSet};
use super::classify::{classify_all_with, Exclusion};
use super::index::SpatialIndex;
use super::record::{EntityId, GeometryRecord, Tolerances};
use super::resolve::{self, DuplicateSet, ResolveOrder, ResolveStats};
use crate::host::GeometryProvider;
use crate::progress::{ProgressCallback, PHASE_CLASSIFY, PHASE_COMPARE};

/// Configuration for one engine run.
#[derive(Clone)]
pub struct EngineConfig {
    /// Distance and angle tolerances, shared by every query and comparison.
    pub tolerances: Tolerances,
    /// Order in which candidate pairs are resolved.
    pub order: ResolveOrder,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("tolerances", &self.tolerances)
            .field("order", &self.order)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            order: ResolveOrder::default(),
            progress_callback: None,
        }
    }

    /// Set the candidate resolution order.
    #[must_use]
    pub fn with_order(mut self, order: ResolveOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from one run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Handles in the selection, repeats included.
    pub selected: usize,
    /// Handles that became records.
    pub classified: usize,
    /// Handles the provider could not resolve.
    pub unresolved: usize,
    /// Handles whose geometry had no usable box.
    pub without_box: usize,
    /// Handles listed more than once.
    pub repeated: usize,
    /// Distinct candidate pairs from the broad phase.
    pub candidate_pairs: usize,
    /// Pairs that reached the comparator.
    pub compared_pairs: usize,
    /// Pairs skipped because one side was already a duplicate.
    pub skipped_pairs: usize,
    /// Compared pairs of different kinds.
    pub incomparable_pairs: usize,
    /// Size of the final duplicate set.
    pub duplicates: usize,
    pub classify_duration: Duration,
    pub index_duration: Duration,
    pub compare_duration: Duration,
}

impl RunSummary {
    /// Total wall time across all phases.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.classify_duration + self.index_duration + self.compare_duration
    }

    /// Share of candidate pairs that needed a narrow-phase comparison, in percent.
    #[must_use]
    pub fn comparison_rate(&self) -> f64 {
        if self.candidate_pairs == 0 {
            0.0
        } else {
            (self.compared_pairs as f64 / self.candidate_pairs as f64) * 100.0
        }
    }
}

/// Runs the complete deduplication pipeline.
pub struct DedupEngine {
    config: EngineConfig,
}

impl DedupEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify `selection` through `provider` and find duplicates among it.
    ///
    /// Handles that cannot be classified are counted in the summary and
    /// otherwise ignored.
    pub fn find_duplicates(
        &self,
        selection: &[EntityId],
        provider: &dyn GeometryProvider,
    ) -> (DuplicateSet, RunSummary) {
        let started = Instant::now();
        self.phase_start(PHASE_CLASSIFY, selection.len());
        let classified = classify_all_with(selection, provider, |done, _| {
            self.phase_progress(done, "");
        });
        self.phase_end(PHASE_CLASSIFY);
        let classify_duration = started.elapsed();

        let mut summary = RunSummary {
            selected: selection.len(),
            classified: classified.records.len(),
            classify_duration,
            ..RunSummary::default()
        };
        for (_, reason) in &classified.excluded {
            match reason {
                Exclusion::Unresolved => summary.unresolved += 1,
                Exclusion::NoBoundingBox => summary.without_box += 1,
                Exclusion::Repeated => summary.repeated += 1,
            }
        }
        log::info!(
            "Classify: {} of {} handles usable ({} unresolved, {} without a box)",
            summary.classified,
            summary.selected,
            summary.unresolved,
            summary.without_box
        );

        let set = self.run_records(&classified.records, &mut summary);
        (set, summary)
    }

    /// Find duplicates among records that are already classified.
    #[must_use]
    pub fn find_duplicates_in_records(
        &self,
        records: &[GeometryRecord],
    ) -> (DuplicateSet, RunSummary) {
        let mut summary = RunSummary {
            selected: records.len(),
            classified: records.len(),
            ..RunSummary::default()
        };
        let set = self.run_records(records, &mut summary);
        (set, summary)
    }

    fn run_records(&self, records: &[GeometryRecord], summary: &mut RunSummary) -> DuplicateSet {
        let tol = &self.config.tolerances;

        let started = Instant::now();
        let index = SpatialIndex::build(records);
        let pairs = candidates::generate(records, &index, tol);
        summary.index_duration = started.elapsed();
        summary.candidate_pairs = pairs.len();
        log::info!(
            "Index: {} records, {} candidate pairs (distance tolerance {})",
            index.len(),
            pairs.len(),
            tol.distance()
        );

        let started = Instant::now();
        let (set, stats) = self.resolve(records, &pairs);
        summary.compare_duration = started.elapsed();
        summary.compared_pairs = stats.compared;
        summary.skipped_pairs = stats.skipped;
        summary.incomparable_pairs = stats.incomparable;
        summary.duplicates = set.len();
        log::info!(
            "Compare: {} pairs compared, {} skipped, {} duplicates ({} order)",
            stats.compared,
            stats.skipped,
            set.len(),
            self.config.order
        );

        set
    }

    fn resolve(
        &self,
        records: &[GeometryRecord],
        pairs: &CandidateSet,
    ) -> (DuplicateSet, ResolveStats) {
        let tol = &self.config.tolerances;
        let by_id = resolve::records_by_id(records);

        self.phase_start(PHASE_COMPARE, pairs.len());
        let mut visited = 0;
        let result = resolve::resolve_with(pairs, self.config.order, |pair| {
            visited += 1;
            self.phase_progress(visited, "");
            resolve::judge(&by_id, pair, tol)
        });
        self.phase_end(PHASE_COMPARE);
        result
    }

    fn phase_start(&self, phase: &str, total: usize) {
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_start(phase, total);
        }
    }

    fn phase_progress(&self, current: usize, label: &str) {
        if let Some(cb) = &self.config.progress_callback {
            cb.on_progress(current, label);
        }
    }

    fn phase_end(&self, phase: &str) {
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_end(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::host::HostGeometry;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct Points(HashMap<EntityId, Point3>);

    impl GeometryProvider for Points {
        fn resolve(&self, handle: EntityId) -> Option<HostGeometry> {
            self.0.get(&handle).copied().map(HostGeometry::Point)
        }
    }

    fn provider(xs: &[(u64, f64)]) -> Points {
        Points(
            xs.iter()
                .map(|&(id, x)| (EntityId(id), Point3::new(x, 0.0, 0.0)))
                .collect(),
        )
    }

    fn engine(d: f64) -> DedupEngine {
        DedupEngine::new(EngineConfig::new(Tolerances::new(d, 0.0).unwrap()))
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl ProgressCallback for Recorder {
        fn on_phase_start(&self, phase: &str, total: usize) {
            self.0.lock().unwrap().push(format!("start {phase} {total}"));
        }
        fn on_progress(&self, current: usize, _label: &str) {
            self.0.lock().unwrap().push(current.to_string());
        }
        fn on_phase_end(&self, phase: &str) {
            self.0.lock().unwrap().push(format!("end {phase}"));
        }
    }

    #[test]
    fn test_find_duplicates_counts() {
        let points = provider(&[(1, 0.0), (2, 0.0), (3, 10.0)]);
        let selection: Vec<EntityId> = [1, 2, 3, 4, 2].into_iter().map(EntityId).collect();
        let (set, summary) = engine(0.01).find_duplicates(&selection, &points);

        assert_eq!(set.ids().into_iter().collect::<Vec<_>>(), vec![EntityId(2)]);
        assert_eq!(summary.selected, 5);
        assert_eq!(summary.classified, 3);
        assert_eq!(summary.unresolved, 1);
        assert_eq!(summary.repeated, 1);
        assert_eq!(summary.candidate_pairs, 1);
        assert_eq!(summary.compared_pairs, 1);
        assert_eq!(summary.duplicates, 1);
        assert!((summary.comparison_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_records() {
        let (set, summary) = engine(1.0).find_duplicates_in_records(&[]);
        assert!(set.is_empty());
        assert_eq!(summary.candidate_pairs, 0);
        assert_eq!(summary.comparison_rate(), 0.0);
    }

    #[test]
    fn test_order_is_applied() {
        let points = provider(&[(1, 0.0), (2, 0.09), (3, 0.19)]);
        let selection: Vec<EntityId> = (1..=3).map(EntityId).collect();
        let tol = Tolerances::new(0.1, 0.0).unwrap();

        let asc = DedupEngine::new(EngineConfig::new(tol)).find_duplicates(&selection, &points);
        let desc = DedupEngine::new(EngineConfig::new(tol).with_order(ResolveOrder::Descending))
            .find_duplicates(&selection, &points);
        assert_eq!(asc.0.len(), 1);
        assert_eq!(desc.0.len(), 2);
    }

    #[test]
    fn test_progress_phases_reported() {
        let recorder = Arc::new(Recorder::default());
        let config = EngineConfig::new(Tolerances::new(0.0, 0.0).unwrap())
            .with_progress_callback(recorder.clone());
        let points = provider(&[(1, 0.0), (2, 0.0)]);
        let _ = DedupEngine::new(config).find_duplicates(&[EntityId(1), EntityId(2)], &points);

        let events = recorder.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "start classify 2",
                "1",
                "2",
                "end classify",
                "start compare 1",
                "1",
                "end compare"
            ]
        );
    }

    #[test]
    fn test_config_debug_hides_callback() {
        let config = EngineConfig::new(Tolerances::new(0.0, 0.0).unwrap())
            .with_progress_callback(Arc::new(Recorder::default()));
        let debug = format!("{config:?}");
        assert!(debug.contains("<callback>"));
    }
}
