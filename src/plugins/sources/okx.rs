use async_trait::async_trait;
use std::time::Duration;

use crate::element_finder::SelectorCascade;
use crate::extractor::RecordExtractor;
use crate::models::{Company, JobRecord};
use crate::plugins::listing::{scrape_listing, ListingProfile, LoadMore, Pacing};
use crate::plugins::traits::{SourceContext, SourcePlugin};
use crate::scraper::WaitCondition;
use crate::Result;

pub const LISTING_URL: &str = "https://www.okx.com/join-us/openings";

pub struct OkxSource {
    profile: ListingProfile,
}

impl OkxSource {
    pub fn new() -> Self {
        Self::with_listing_url(LISTING_URL)
    }

    pub fn with_listing_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let profile = ListingProfile {
            wait: WaitCondition::NetworkIdle,
            ready: None,
            load_more: Some(LoadMore {
                selector: r#"[class*="load-more"]"#.to_string(),
                button_labels: vec!["load more".to_string(), "show all".to_string()],
                max_clicks: 10,
                delay: Duration::from_secs(1),
            }),
            pacing: Pacing {
                initial_settle: Duration::from_secs(3),
                scrolls: 10,
                scroll_delay: Duration::from_millis(500),
                final_settle: Duration::ZERO,
            },
            cascade: SelectorCascade::new([
                r#"[class*="job"]"#,
                r#"[class*="position"]"#,
                r#"[class*="opening"]"#,
                r#"a[href*="/job/"]"#,
            ])
            .with_fallback(r#"a[href*="job"], a[href*="position"], a[href*="opening"]"#),
            extractor: RecordExtractor::new(Company::Okx, url.clone()),
            url,
        };
        Self { profile }
    }
}

impl Default for OkxSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourcePlugin for OkxSource {
    fn company(&self) -> Company {
        Company::Okx
    }

    fn description(&self) -> &str {
        "OKX openings (expanded through its load-more control)"
    }

    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<JobRecord>> {
        scrape_listing(ctx, &self.profile).await
    }
}
