//! Record Store - bibliographic entries and the sets that hold them.
//!
//! A [`Record`] is immutable once loaded. A [`RecordSet`] is a cheap,
//! shareable sequence of `Rc<Record>`: filtered views point at the same
//! records as the full set, nothing is copied.

use std::fmt;
use std::rc::Rc;

/// Pseudo-field name under which the entry type is exposed for matching.
pub const ENTRY_TYPE_FIELD: &str = "ENTRYTYPE";

/// Pseudo-field name under which the citation key is exposed for matching.
pub const KEY_FIELD: &str = "ID";

// =============================================================================
// RECORD
// =============================================================================

/// One bibliographic entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    entry_type: String,
    key: String,
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field insertion. A repeated name replaces the earlier
    /// value in place, keeping its original position.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_field(name.into(), value.into());
        self
    }

    pub(crate) fn push_field(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Look up a regular field by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Regular fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Every searchable (name, value) pair: `ENTRYTYPE` and `ID` first,
    /// then the regular fields.
    pub fn searchable(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            (ENTRY_TYPE_FIELD, self.entry_type.as_str()),
            (KEY_FIELD, self.key.as_str()),
        ]
        .into_iter()
        .chain(self.fields())
    }
}

// =============================================================================
// RECORD SET
// =============================================================================

/// Ordered, immutable sequence of shared records.
///
/// Cloning is O(1). Equality is by identity: two sets are equal when they
/// hold the same `Rc<Record>` instances in the same order.
#[derive(Clone, Default)]
pub struct RecordSet {
    records: Rc<[Rc<Record>]>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        records.into_iter().map(Rc::new).collect()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rc<Record>> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rc<Record>> {
        self.records.iter()
    }

    /// True when both handles point at the same backing storage.
    pub fn same_storage(&self, other: &RecordSet) -> bool {
        Rc::ptr_eq(&self.records, &other.records)
    }

    /// True when `self` is an order-preserving subsequence of `full`
    /// (by record identity).
    pub fn is_subsequence_of(&self, full: &RecordSet) -> bool {
        let mut rest = full.iter();
        self.iter()
            .all(|needle| rest.by_ref().any(|candidate| Rc::ptr_eq(needle, candidate)))
    }
}

impl FromIterator<Rc<Record>> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Rc<Record>>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Rc<Record>;
    type IntoIter = std::slice::Iter<'a, Rc<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for RecordSet {
    fn eq(&self, other: &Self) -> bool {
        self.same_storage(other)
            || (self.len() == other.len()
                && self.iter().zip(other.iter()).all(|(a, b)| Rc::ptr_eq(a, b)))
    }
}

impl Eq for RecordSet {}

impl fmt::Debug for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|r| r.key()))
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
