//! Record store
//!
//! Insertion-ordered collection of unique floor sheet records. Uniqueness is
//! keyed on the contract number; a key index backs the membership check so a
//! full run stays linear instead of quadratic in the store size.

use std::collections::HashSet;

use crate::domain::record::FloorSheetRecord;

/// The deduplicated, insertion-ordered set of collected records.
///
/// Append-only: existing records are never edited or removed. There is exactly
/// one writer (the pagination controller), so no interior locking is needed.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<FloorSheetRecord>,
    keys: HashSet<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from previously persisted records.
    ///
    /// Prior persistence upholds the uniqueness invariant, but duplicated keys
    /// are tolerated defensively: the first occurrence wins and later copies
    /// are dropped.
    pub fn load(existing: Vec<FloorSheetRecord>) -> Self {
        let mut store = Self::new();
        store.merge(existing);
        store
    }

    /// Append every record whose contract number is not already present, in
    /// order. Records already present are silently dropped. Returns how many
    /// records were newly appended.
    ///
    /// Merging the same page twice yields no further growth, which is what
    /// makes re-running a session over already-collected pages safe.
    pub fn merge(&mut self, page: Vec<FloorSheetRecord>) -> usize {
        let before = self.records.len();
        for record in page {
            if self.keys.insert(record.contract_no.clone()) {
                self.records.push(record);
            }
        }
        self.records.len() - before
    }

    pub fn contains(&self, contract_no: &str) -> bool {
        self.keys.contains(contract_no)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ordered view of the full store, as persisted.
    pub fn records(&self) -> &[FloorSheetRecord] {
        &self.records
    }
}
