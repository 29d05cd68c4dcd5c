use async_trait::async_trait;
use std::time::Duration;

use crate::element_finder::SelectorCascade;
use crate::extractor::RecordExtractor;
use crate::models::{Company, JobRecord};
use crate::plugins::listing::{scrape_listing, ListingProfile, Pacing};
use crate::plugins::traits::{SourceContext, SourcePlugin};
use crate::scraper::WaitCondition;
use crate::Result;

pub const LISTING_URL: &str = "https://www.binance.com/en/careers/job-openings?team=All";

/// Site navigation links that share the careers prefix with real postings.
const NAVIGATION_LINKS: [&str; 5] = ["/job-openings", "/team", "/culture", "/benefits", "/life"];

pub struct BinanceSource {
    profile: ListingProfile,
}

impl BinanceSource {
    pub fn new() -> Self {
        Self::with_listing_url(LISTING_URL)
    }

    pub fn with_listing_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let profile = ListingProfile {
            wait: WaitCondition::DomContentLoaded,
            ready: None,
            load_more: None,
            pacing: Pacing {
                initial_settle: Duration::from_secs(5),
                scrolls: 10,
                scroll_delay: Duration::from_secs(1),
                final_settle: Duration::from_secs(2),
            },
            cascade: SelectorCascade::new([
                r#"a[href*="/careers/"][href*="detail"]"#,
                r#"a[href*="/en/careers/"]"#,
                r#"[data-testid*="job"]"#,
                ".job-item",
                r#"[class*="position"]"#,
            ])
            .with_fallback(r#"a[href*="/careers/"]"#),
            extractor: RecordExtractor::new(Company::Binance, url.clone()).excluding_links(NAVIGATION_LINKS),
            url,
        };
        Self { profile }
    }
}

impl Default for BinanceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourcePlugin for BinanceSource {
    fn company(&self) -> Company {
        Company::Binance
    }

    fn description(&self) -> &str {
        "Binance careers listing (static page, lazy-loaded by scrolling)"
    }

    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<JobRecord>> {
        scrape_listing(ctx, &self.profile).await
    }
}
