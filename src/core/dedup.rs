use std::collections::HashSet;

use crate::models::JobRecord;

/// Drop records whose (title, location) was already seen. The first
/// occurrence wins and input order is kept. Comparison is exact.
pub fn deduplicate(records: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert((record.title.clone(), record.location.clone())))
        .collect()
}
