use crate::core::vocab::{contains_any, GRADUATE_KEYWORDS, HONG_KONG_KEYWORDS, MAINLAND_CHINA_KEYWORDS};
use crate::models::{JobRecord, MatchReason};

pub fn is_in_hong_kong(location: &str) -> bool {
    contains_any(location, HONG_KONG_KEYWORDS)
}

pub fn is_in_mainland_china(location: &str) -> bool {
    contains_any(location, MAINLAND_CHINA_KEYWORDS)
}

pub fn is_graduate_position(title: &str, team: &str) -> bool {
    contains_any(&format!("{} {}", title, team), GRADUATE_KEYWORDS)
}

/// Why `record` should be kept, or `None` to drop it.
///
/// A Hong Kong location always takes precedence. Otherwise graduate
/// postings are kept unless they are located in mainland China.
pub fn match_reason(record: &JobRecord) -> Option<MatchReason> {
    if is_in_hong_kong(&record.location) {
        return Some(MatchReason::HongKong);
    }

    if is_graduate_position(&record.title, &record.team) && !is_in_mainland_china(&record.location) {
        return Some(MatchReason::GraduateNonMainland);
    }

    None
}

/// Keep matching records, tagged with their match reason, in input order.
pub fn classify(records: Vec<JobRecord>) -> Vec<JobRecord> {
    records
        .into_iter()
        .filter_map(|record| {
            let reason = match_reason(&record)?;
            Some(record.with_match_reason(reason))
        })
        .collect()
}
