//! Duplicate detection.
//!
//! This module provides:
//! - Geometry classification into typed records ([`classify`])
//! - A broad-phase spatial index over record boxes ([`index`])
//! - Candidate pair generation ([`candidates`])
//! - Kind-specific deviation estimators ([`compare`])
//! - Greedy resolution into a duplicate set ([`resolve`])
//! - The pipeline orchestrator ([`finder`])

pub mod candidates;
pub mod classify;
pub mod compare;
pub mod finder;
pub mod index;
pub mod record;
pub mod resolve;

pub use candidates::{Candidate, CandidateSet};
pub use classify::{classify, classify_all, classify_all_with, Classified, Exclusion};
pub use compare::{compare, Deviation, Verdict};
pub use finder::{DedupEngine, EngineConfig, RunSummary};
pub use index::SpatialIndex;
pub use record::{EntityId, GeometryRecord, Kind, Payload, Tolerances};
pub use resolve::{resolve, resolve_with, DuplicateSet, Judgement, ResolveOrder, ResolveStats};
