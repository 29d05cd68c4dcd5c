use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ScraperConfig;
use crate::models::{Company, JobRecord};
use crate::probe::HttpProbe;
use crate::scraper::SessionFactory;
use crate::Result;

/// Capabilities handed to every source for one run.
#[derive(Clone)]
pub struct SourceContext {
    pub sessions: Arc<dyn SessionFactory>,
    /// `None` disables API probing (e.g. offline snapshot runs).
    pub probe: Option<Arc<dyn HttpProbe>>,
    pub scraper: ScraperConfig,
}

impl SourceContext {
    pub fn new(sessions: Arc<dyn SessionFactory>, scraper: ScraperConfig) -> Self {
        Self {
            sessions,
            probe: None,
            scraper,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn HttpProbe>) -> Self {
        self.probe = Some(probe);
        self
    }
}

/// Trait for implementing employer career-site sources
#[async_trait]
pub trait SourcePlugin: Send + Sync {
    /// Plugin metadata
    fn company(&self) -> Company;
    fn description(&self) -> &str;

    fn name(&self) -> &'static str {
        self.company().as_str()
    }

    /// Raw records in page order. Every record carries `company()`.
    /// Any session opened here must be closed before returning.
    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<JobRecord>>;
}
