//! Greedy equivalence resolution.
//!
//! Candidate pairs are visited once, in a fixed order. A pair is skipped if
//! either id is already marked; otherwise it is compared and, on a match,
//! the larger id is marked as a duplicate of the smaller one. There is no
//! backtracking, so in a chain of near entities the kept representative can
//! end up farther than the tolerance from an id it displaced.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use super::candidates::{Candidate, CandidateSet};
use super::compare::{compare, Verdict};
use super::record::{EntityId, GeometryRecord, Tolerances};

/// Order in which candidate pairs are visited.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ResolveOrder {
    /// Ascending by `(smaller id, larger id)`.
    #[default]
    Ascending,
    /// Descending by `(smaller id, larger id)`.
    Descending,
}

impl fmt::Display for ResolveOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => f.write_str("ascending"),
            Self::Descending => f.write_str("descending"),
        }
    }
}

/// Ids flagged as duplicates, each with the representative it matched.
///
/// Only the resolver writes to this set; callers receive it by value once
/// every candidate has been processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateSet {
    marked: BTreeMap<EntityId, EntityId>,
}

impl DuplicateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mark(&mut self, duplicate: EntityId, representative: EntityId) {
        self.marked.entry(duplicate).or_insert(representative);
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.marked.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Duplicate ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<EntityId> {
        self.marked.keys().copied().collect()
    }

    /// `(duplicate, representative)` pairs in ascending duplicate order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        self.marked.iter().map(|(d, r)| (*d, *r))
    }

    /// The id that was kept when `id` was marked.
    #[must_use]
    pub fn representative_of(&self, id: EntityId) -> Option<EntityId> {
        self.marked.get(&id).copied()
    }
}

/// Outcome of judging one pair during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    Duplicate,
    Distinct,
    /// Kinds differ, or a record is missing.
    Incomparable,
}

/// Counters from one resolver pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Pairs handed to the judge.
    pub compared: usize,
    /// Pairs skipped because one side was already marked.
    pub skipped: usize,
    /// Compared pairs that could not be judged.
    pub incomparable: usize,
}

/// Run the greedy pass with a caller-supplied judge.
///
/// `judge` is called at most once per candidate, and only while neither id
/// is marked.
pub fn resolve_with<F>(
    candidates: &CandidateSet,
    order: ResolveOrder,
    mut judge: F,
) -> (DuplicateSet, ResolveStats)
where
    F: FnMut(&Candidate) -> Judgement,
{
    let mut set = DuplicateSet::new();
    let mut stats = ResolveStats::default();

    let pairs: Box<dyn Iterator<Item = &Candidate>> = match order {
        ResolveOrder::Ascending => Box::new(candidates.iter()),
        ResolveOrder::Descending => Box::new(candidates.iter().rev()),
    };

    for pair in pairs {
        let (a, b) = (pair.first(), pair.second());
        if set.contains(a) || set.contains(b) {
            stats.skipped += 1;
            continue;
        }
        stats.compared += 1;
        match judge(pair) {
            Judgement::Duplicate => {
                log::debug!("{} duplicates {}", b, a);
                set.mark(b, a);
            }
            Judgement::Distinct => {}
            Judgement::Incomparable => stats.incomparable += 1,
        }
    }

    (set, stats)
}

/// Resolve candidates by comparing the records they refer to.
#[must_use]
pub fn resolve(
    candidates: &CandidateSet,
    records: &[GeometryRecord],
    tol: &Tolerances,
    order: ResolveOrder,
) -> (DuplicateSet, ResolveStats) {
    let by_id = records_by_id(records);
    resolve_with(candidates, order, |pair| judge(&by_id, pair, tol))
}

pub(crate) fn records_by_id(records: &[GeometryRecord]) -> HashMap<EntityId, &GeometryRecord> {
    records.iter().map(|r| (r.id, r)).collect()
}

/// Compare one pair; ids without a record are incomparable.
pub(crate) fn judge(
    by_id: &HashMap<EntityId, &GeometryRecord>,
    pair: &Candidate,
    tol: &Tolerances,
) -> Judgement {
    let (Some(a), Some(b)) = (by_id.get(&pair.first()), by_id.get(&pair.second())) else {
        return Judgement::Incomparable;
    };
    let verdict = compare(a, b, tol);
    log::trace!("{} vs {}: {:?}", a.id, b.id, verdict);
    match verdict {
        Verdict::Incomparable => Judgement::Incomparable,
        v if v.is_duplicate(tol) => Judgement::Duplicate,
        _ => Judgement::Distinct,
    }
}
