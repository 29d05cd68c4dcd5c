use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{Company, JobRecord, MatchReason};
use crate::Result;

/// What a single source contributed to a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceOutcome {
    pub source: Company,
    pub records: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceOutcome {
    pub fn succeeded(source: Company, records: usize) -> Self {
        Self { source, records, error: None }
    }

    pub fn failed(source: Company, error: impl Into<String>) -> Self {
        Self {
            source,
            records: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Classified records plus run metadata, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub update_time: DateTime<Utc>,
    pub total_count: usize,
    pub hong_kong_count: usize,
    pub graduate_count: usize,
    pub scraped_count: usize,
    pub deduplicated_count: usize,
    pub sources: Vec<SourceOutcome>,
    pub jobs: Vec<JobRecord>,
}

impl RunReport {
    pub fn new(
        jobs: Vec<JobRecord>,
        sources: Vec<SourceOutcome>,
        scraped_count: usize,
        deduplicated_count: usize,
    ) -> Self {
        let count_reason = |reason: MatchReason| {
            jobs.iter()
                .filter(|job| job.match_reason == Some(reason))
                .count()
        };
        let hong_kong_count = count_reason(MatchReason::HongKong);
        let graduate_count = count_reason(MatchReason::GraduateNonMainland);

        Self {
            update_time: Utc::now(),
            total_count: jobs.len(),
            hong_kong_count,
            graduate_count,
            scraped_count,
            deduplicated_count,
            sources,
            jobs,
        }
    }

    pub fn jobs_for(&self, company: Company) -> impl Iterator<Item = &JobRecord> {
        self.jobs.iter().filter(move |job| job.company == company)
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.sources.iter().filter(|outcome| !outcome.is_success())
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
