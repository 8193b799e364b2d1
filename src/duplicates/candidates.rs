//! Candidate pair generation (broad phase).

use std::collections::BTreeSet;

use super::index::SpatialIndex;
use super::record::{EntityId, GeometryRecord, Tolerances};

/// An unordered pair of distinct ids, stored smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate {
    a: EntityId,
    b: EntityId,
}

impl Candidate {
    /// Canonical pair for two ids, or `None` if they are the same id.
    #[must_use]
    pub fn new(x: EntityId, y: EntityId) -> Option<Self> {
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The smaller id; kept as representative when the pair is a duplicate.
    #[must_use]
    pub fn first(&self) -> EntityId {
        self.a
    }

    /// The larger id; marked duplicate when the pair is a duplicate.
    #[must_use]
    pub fn second(&self) -> EntityId {
        self.b
    }
}

/// Candidate pairs in ascending `(first, second)` order, without repeats.
pub type CandidateSet = BTreeSet<Candidate>;

/// Query the index once per record with its box expanded by the distance
/// tolerance, collecting every other record hit.
///
/// Kinds are not filtered here; mixed-kind pairs are rejected by the comparator.
#[must_use]
pub fn generate(records: &[GeometryRecord], index: &SpatialIndex, tol: &Tolerances) -> CandidateSet {
    let mut pairs = CandidateSet::new();
    for record in records {
        let search = record.bbox.expanded(tol.distance());
        for hit in index.query(&search) {
            if let Some(pair) = Candidate::new(record.id, hit) {
                pairs.insert(pair);
            }
        }
    }
    log::debug!(
        "Broad phase: {} records produced {} candidate pairs",
        records.len(),
        pairs.len()
    );
    pairs
}
