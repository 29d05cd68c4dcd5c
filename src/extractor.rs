use tracing::trace;
use url::Url;

use crate::core::vocab::{contains_any, LOCATION_MARKERS};
use crate::models::{Company, JobRecord, NewJobRecord};
use crate::scraper::PageElement;

/// Titles shorter than this are layout noise, not postings.
pub const MIN_TITLE_CHARS: usize = 4;

/// Team lines must be longer than this.
const MIN_TEAM_CHARS: usize = 3;

/// Fields recovered from an element's rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLines {
    pub title: String,
    pub location: Option<String>,
    pub team: Option<String>,
}

/// Turns posting candidate elements into job records for one site.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    company: Company,
    listing_url: String,
    origin: String,
    excluded_links: Vec<String>,
}

/// Trimmed, non-empty lines in rendered order.
pub fn text_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Split rendered text into title, location and team.
///
/// The first line is the title. Following lines are scanned in order: the
/// first one containing a location marker becomes the location and ends the
/// scan; before that, the first line longer than two characters becomes the
/// team. Returns `None` when the title is missing or too short.
pub fn parse_lines(text: &str) -> Option<ParsedLines> {
    let lines = text_lines(text);
    let (title, rest) = lines.split_first()?;
    if title.chars().count() < MIN_TITLE_CHARS {
        return None;
    }

    let mut location = None;
    let mut team = None;
    for line in rest {
        if contains_any(line, LOCATION_MARKERS) {
            location = Some(line.to_string());
            break;
        }
        if team.is_none() && line.chars().count() >= MIN_TEAM_CHARS {
            team = Some(line.to_string());
        }
    }

    Some(ParsedLines {
        title: title.to_string(),
        location,
        team,
    })
}

/// Scheme and host of `url`, without a trailing slash.
pub fn origin_of(url: &str) -> String {
    Url::parse(url)
        .map(|parsed| parsed.origin().ascii_serialization())
        .unwrap_or_default()
}

impl RecordExtractor {
    pub fn new(company: Company, listing_url: impl Into<String>) -> Self {
        let listing_url = listing_url.into();
        let origin = origin_of(&listing_url);
        Self {
            company,
            listing_url,
            origin,
            excluded_links: Vec::new(),
        }
    }

    /// Links containing any of these fragments are site navigation, not postings.
    pub fn excluding_links<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_links = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Make a link absolute. Unresolvable links fall back to the listing page.
    pub fn resolve_link(&self, href: Option<&str>) -> String {
        let href = match href.map(str::trim).filter(|href| !href.is_empty()) {
            Some(href) => href,
            None => return self.listing_url.clone(),
        };

        if href.starts_with('/') && !href.starts_with("//") {
            return format!("{}{}", self.origin, href);
        }

        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }

        Url::parse(&self.listing_url)
            .and_then(|base| base.join(href))
            .map(String::from)
            .unwrap_or_else(|_| self.listing_url.clone())
    }

    fn is_excluded(&self, href: &str) -> bool {
        self.excluded_links
            .iter()
            .any(|fragment| href.contains(fragment.as_str()))
    }

    /// Build a record from already-read element content.
    pub fn build(&self, text: &str, href: Option<&str>) -> Option<JobRecord> {
        if href.is_some_and(|href| self.is_excluded(href)) {
            return None;
        }

        let parsed = parse_lines(text)?;
        Some(JobRecord::new(NewJobRecord {
            title: parsed.title,
            location: parsed.location,
            team: parsed.team,
            url: self.resolve_link(href),
            company: self.company,
        }))
    }

    /// Extract a record from a live element. Missing text or attributes
    /// degrade to placeholders; unusable elements yield `None`.
    pub async fn extract(&self, element: &dyn PageElement) -> Option<JobRecord> {
        let text = match element.inner_text().await {
            Ok(text) => text,
            Err(e) => {
                trace!("Skipping element without readable text: {}", e);
                return None;
            }
        };

        let href = self.link_of(element).await;
        self.build(&text, href.as_deref())
    }

    /// The element's own href, else the href of its first descendant link.
    async fn link_of(&self, element: &dyn PageElement) -> Option<String> {
        if let Ok(Some(href)) = element.attribute("href").await {
            return Some(href);
        }

        match element.query_first("a").await {
            Ok(Some(link)) => link.attribute("href").await.ok().flatten(),
            _ => None,
        }
    }

    /// Extract every usable element, keeping element order.
    pub async fn extract_all(&self, elements: &[Box<dyn PageElement>]) -> Vec<JobRecord> {
        let mut records = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(record) = self.extract(element.as_ref()).await {
                records.push(record);
            }
        }
        records
    }
}
