//! Full-Text Matcher - narrows a [`RecordSet`] to the records a
//! [`Matcher`] finds anywhere in any field.

use std::rc::Rc;

use crate::pattern::Matcher;
use crate::record::{Record, RecordSet};

/// True if `matcher` occurs in at least one searchable field of `record`.
/// Stops at the first matching field.
#[inline]
pub fn record_matches(record: &Record, matcher: &Matcher) -> bool {
    record.searchable().any(|(_, value)| matcher.is_match(value))
}

/// Filter `records` down to the matching ones, keeping their order.
///
/// The output shares the input's `Rc<Record>` instances. A match-all matcher
/// returns `records` itself without scanning.
pub fn filter(records: &RecordSet, matcher: &Matcher) -> RecordSet {
    if matcher.is_match_all() {
        return records.clone();
    }
    records
        .iter()
        .filter(|record| record_matches(record, matcher))
        .map(Rc::clone)
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
