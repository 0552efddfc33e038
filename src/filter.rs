//! Roster filtering by name substring and role membership.
//!
//! Filtering is a pure function of the full roster and the current
//! criteria; results keep roster order.

use crate::state::{FilterCriteria, PlayerRecord};

pub fn apply<'a>(records: &'a [PlayerRecord], criteria: &FilterCriteria) -> Vec<&'a PlayerRecord> {
    let needle = criteria.search_text.to_lowercase();
    records
        .iter()
        .filter(|record| matches_needle(record, &needle, criteria))
        .collect()
}

/// Same as [`apply`] but yields positions in `records`.
pub fn matching_indices(records: &[PlayerRecord], criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.search_text.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_needle(record, &needle, criteria))
        .map(|(idx, _)| idx)
        .collect()
}

pub fn matches(record: &PlayerRecord, criteria: &FilterCriteria) -> bool {
    matches_needle(record, &criteria.search_text.to_lowercase(), criteria)
}

fn matches_needle(record: &PlayerRecord, needle: &str, criteria: &FilterCriteria) -> bool {
    criteria.role.matches(&record.roles)
        && (needle.is_empty() || record.name.to_lowercase().contains(needle))
}
