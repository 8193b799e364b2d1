//! CSV output formatter.
//!
//! One row per duplicate object.
//!
//! # Columns
//!
//! - `id`: Id of the duplicate
//! - `representative`: Id of the object it duplicates
//! - `kind`: Geometry kind, empty if unknown

use std::collections::BTreeMap;
use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::{DuplicateSet, EntityId, Kind};

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow {
    id: u64,
    representative: u64,
    kind: &'static str,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    set: &'a DuplicateSet,
    kinds: &'a BTreeMap<EntityId, Kind>,
}

impl<'a> CsvOutput<'a> {
    #[must_use]
    pub fn new(set: &'a DuplicateSet, kinds: &'a BTreeMap<EntityId, Kind>) -> Self {
        Self { set, kinds }
    }

    /// Write the rows, with a header, to `writer`.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.set.is_empty() {
            csv_writer.write_record(["id", "representative", "kind"])?;
        }
        for (id, representative) in self.set.iter() {
            csv_writer.serialize(CsvRow {
                id: id.0,
                representative: representative.0,
                kind: self.kinds.get(&id).map_or("", |k| k.as_str()),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::{resolve_with, Candidate, CandidateSet, Judgement, ResolveOrder};

    fn set_of(pairs: &[(u64, u64)]) -> DuplicateSet {
        let candidates: CandidateSet = pairs
            .iter()
            .filter_map(|&(a, b)| Candidate::new(EntityId(a), EntityId(b)))
            .collect();
        resolve_with(&candidates, ResolveOrder::Ascending, |_| Judgement::Duplicate).0
    }

    #[test]
    fn test_csv_rows() {
        let set = set_of(&[(1, 2), (5, 7)]);
        let kinds = BTreeMap::from([(EntityId(2), Kind::Curve)]);
        let csv = CsvOutput::new(&set, &kinds).to_string().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["id,representative,kind", "2,1,curve", "7,5,"]);
    }

    #[test]
    fn test_csv_empty_has_header() {
        let set = DuplicateSet::new();
        let kinds = BTreeMap::new();
        let csv = CsvOutput::new(&set, &kinds).to_string().unwrap();
        assert_eq!(csv.trim(), "id,representative,kind");
    }
}
