//! Shared page strategy for career listing pages: navigate, settle, expand
//! "load more" controls, scroll to trigger lazy loading, then resolve and
//! extract postings.

use std::time::Duration;
use tokio::time::sleep;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use crate::core::vocab::contains_any;
use crate::element_finder::SelectorCascade;
use crate::extractor::RecordExtractor;
use crate::models::JobRecord;
use crate::plugins::traits::SourceContext;
use crate::scraper::{Page, PageElement, WaitCondition, SCROLL_TO_BOTTOM};
use crate::{AppError, Result};

#[derive(Debug, Clone, Default)]
pub struct Pacing {
    /// Pause after navigation before touching the page.
    pub initial_settle: Duration,
    pub scrolls: u32,
    pub scroll_delay: Duration,
    /// Pause after the last scroll.
    pub final_settle: Duration,
}

#[derive(Debug, Clone)]
pub struct LoadMore {
    /// Matches the control directly.
    pub selector: String,
    /// Otherwise a `button` whose text contains one of these (lowercase).
    pub button_labels: Vec<String>,
    pub max_clicks: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct ReadySelector {
    pub selector: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ListingProfile {
    pub url: String,
    pub wait: WaitCondition,
    pub ready: Option<ReadySelector>,
    pub load_more: Option<LoadMore>,
    pub pacing: Pacing,
    pub cascade: SelectorCascade,
    pub extractor: RecordExtractor,
}

/// Scrape one listing page in a fresh session. The session is closed on
/// every path.
pub async fn scrape_listing(ctx: &SourceContext, profile: &ListingProfile) -> Result<Vec<JobRecord>> {
    let page = ctx.sessions.open().await?;
    let result = run_listing(page.as_ref(), ctx, profile).await;

    if let Err(e) = page.close().await {
        warn!("Failed to close session for {}: {}", profile.url, e);
    }

    result
}

async fn run_listing(page: &dyn Page, ctx: &SourceContext, profile: &ListingProfile) -> Result<Vec<JobRecord>> {
    navigate(page, ctx, profile).await?;
    sleep(profile.pacing.initial_settle).await;

    if let Some(ready) = &profile.ready {
        page.wait_for(&ready.selector, ready.timeout).await?;
    }

    if let Some(load_more) = &profile.load_more {
        let clicks = expand(page, load_more).await;
        debug!("Activated load-more {} times on {}", clicks, profile.url);
    }

    for _ in 0..profile.pacing.scrolls {
        page.evaluate(SCROLL_TO_BOTTOM).await?;
        sleep(profile.pacing.scroll_delay).await;
    }
    sleep(profile.pacing.final_settle).await;

    let resolved = profile.cascade.resolve(page).await;
    debug!("{}: {:?} ({} elements)", profile.url, resolved.hit, resolved.elements.len());

    Ok(profile.extractor.extract_all(&resolved.elements).await)
}

async fn navigate(page: &dyn Page, ctx: &SourceContext, profile: &ListingProfile) -> Result<()> {
    let timeout = ctx.scraper.navigation_timeout();
    let strategy = FixedInterval::from_millis(ctx.scraper.retry_delay_ms)
        .take(ctx.scraper.retry_attempts as usize);

    let mut attempt = 0u32;
    RetryIf::spawn(
        strategy,
        || {
            attempt += 1;
            if attempt > 1 {
                debug!("Retrying navigation to {} (attempt {})", profile.url, attempt);
            }
            page.navigate(&profile.url, profile.wait, timeout)
        },
        is_retryable,
    )
    .await
}

/// A timed-out navigation may still be running on the session's tab, so only
/// failures that finished are retried.
fn is_retryable(error: &AppError) -> bool {
    !matches!(error, AppError::Timeout { .. })
}

/// Activate the load-more control until it disappears or the click budget
/// runs out. Returns the number of clicks.
pub async fn expand(page: &dyn Page, load_more: &LoadMore) -> u32 {
    let mut clicks = 0;
    while clicks < load_more.max_clicks {
        let Some(control) = find_load_more(page, load_more).await else {
            break;
        };
        if let Err(e) = control.click().await {
            debug!("Load-more click failed: {}", e);
            break;
        }
        clicks += 1;
        sleep(load_more.delay).await;
    }
    clicks
}

async fn find_load_more(page: &dyn Page, load_more: &LoadMore) -> Option<Box<dyn PageElement>> {
    if let Ok(found) = page.query_all(&load_more.selector).await {
        if let Some(control) = found.into_iter().next() {
            return Some(control);
        }
    }

    let labels: Vec<&str> = load_more.button_labels.iter().map(String::as_str).collect();
    let buttons = page.query_all("button").await.ok()?;
    for button in buttons {
        if let Ok(text) = button.inner_text().await {
            if contains_any(&text, &labels) {
                return Some(button);
            }
        }
    }
    None
}
