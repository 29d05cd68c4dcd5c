use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Company, MatchReason};

/// Placeholder location for postings whose location line could not be found.
pub const LOCATION_NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobRecord {
    pub title: String,
    pub location: String,
    pub team: String,
    pub url: String,
    pub company: Company,

    // Set by the classifier only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_reason: Option<MatchReason>,
}

#[derive(Debug, Clone)]
pub struct NewJobRecord {
    pub title: String,
    pub location: Option<String>,
    pub team: Option<String>,
    pub url: String,
    pub company: Company,
}

impl JobRecord {
    pub fn new(new_record: NewJobRecord) -> Self {
        Self {
            title: new_record.title,
            location: new_record
                .location
                .unwrap_or_else(|| LOCATION_NOT_SPECIFIED.to_string()),
            team: new_record.team.unwrap_or_default(),
            url: new_record.url,
            company: new_record.company,
            match_reason: None,
        }
    }

    /// Identity used for deduplication.
    pub fn identity(&self) -> (&str, &str) {
        (&self.title, &self.location)
    }

    /// Attach a match reason. A reason that is already set is kept.
    pub fn with_match_reason(mut self, reason: MatchReason) -> Self {
        if self.match_reason.is_none() {
            self.match_reason = Some(reason);
        }
        self
    }
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.company, self.title, self.location)
    }
}
