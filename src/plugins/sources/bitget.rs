//! Bitget hires through a Mokahr recruitment portal. The portal's JSON API is
//! tried first; the rendered portal page is the fallback.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::element_finder::first_non_empty;
use crate::element_finder::SelectorCascade;
use crate::extractor::RecordExtractor;
use crate::models::{Company, JobRecord, NewJobRecord};
use crate::plugins::listing::{scrape_listing, ListingProfile, Pacing, ReadySelector};
use crate::plugins::traits::{SourceContext, SourcePlugin};
use crate::probe::HttpProbe;
use crate::scraper::WaitCondition;
use crate::Result;

/// Portal root; API records link to `{PORTAL_URL}#/job/{id}`.
pub const PORTAL_URL: &str = "https://hire-r1.mokahr.com/social-recruitment/bitget/100004136";
pub const LISTING_URL: &str = "https://hire-r1.mokahr.com/social-recruitment/bitget/100004136?locale=en-US#/jobs";
pub const API_ENDPOINTS: [&str; 2] = [
    "https://hire-r1.mokahr.com/api-platform/v1/social-recruitment/bitget/100004136/jobs",
    "https://hire-r1.mokahr.com/api/v1/jobs",
];

pub struct BitgetSource {
    use_api: bool,
    endpoints: Vec<String>,
    profile: ListingProfile,
}

impl BitgetSource {
    pub fn new(use_api: bool) -> Self {
        let profile = ListingProfile {
            url: LISTING_URL.to_string(),
            wait: WaitCondition::NetworkIdle,
            ready: Some(ReadySelector {
                selector: r#"[class*="job"], [class*="position"], .recruitment-jobs"#.to_string(),
                timeout: Duration::from_secs(30),
            }),
            load_more: None,
            pacing: Pacing {
                initial_settle: Duration::from_secs(3),
                scrolls: 15,
                scroll_delay: Duration::from_millis(500),
                final_settle: Duration::ZERO,
            },
            cascade: SelectorCascade::new([
                r#"[class*="job-card"]"#,
                r#"[class*="job-item"]"#,
                r#"[class*="position-item"]"#,
                ".job-list-item",
                r##"a[href*="#/job/"]"##,
            ])
            .with_fallback(r#"a[href*="/job"]"#),
            extractor: RecordExtractor::new(Company::Bitget, LISTING_URL),
        };

        Self {
            use_api,
            endpoints: API_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            profile,
        }
    }

    /// Replace the API endpoints, tried in order.
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.profile.pacing = pacing;
        self
    }

    /// Records from the first endpoint that answers with a usable, non-empty
    /// listing. Probe failures are never fatal.
    pub async fn fetch_from_api(&self, probe: &dyn HttpProbe, ctx: &SourceContext) -> Vec<JobRecord> {
        let user_agent = ctx.scraper.user_agent.as_str();
        let headers = [
            ("User-Agent", user_agent),
            ("Accept", "application/json"),
            ("Referer", PORTAL_URL),
        ];
        let timeout = ctx.scraper.request_timeout();

        let hit = first_non_empty(&self.endpoints, |endpoint| {
            let headers = &headers;
            Box::pin(async move {
                let response = probe.get(endpoint, headers, timeout).await?;
                if !response.is_success() {
                    debug!("Bitget endpoint {} answered {}", endpoint, response.status);
                    return Ok(Vec::new());
                }
                Ok(response.json.as_ref().map(parse_listing).unwrap_or_default())
            })
        })
        .await;

        match hit {
            Some((index, records)) => {
                info!("Bitget API {} returned {} jobs", self.endpoints[index], records.len());
                records
            }
            None => Vec::new(),
        }
    }
}

/// Accepts a bare array of postings or an object with a `data` array.
pub fn parse_listing(body: &Value) -> Vec<JobRecord> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items.iter().filter_map(parse_item).collect()
}

fn parse_item(item: &Value) -> Option<JobRecord> {
    let title = text_field(item, &["name", "title"])?;
    let id = match item.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    };

    Some(JobRecord::new(NewJobRecord {
        title,
        location: text_field(item, &["city", "location"]),
        team: text_field(item, &["department", "team"]),
        url: format!("{}#/job/{}", PORTAL_URL, id),
        company: Company::Bitget,
    }))
}

/// First alias holding a non-blank string.
fn text_field(item: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        item.get(*alias)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

#[async_trait]
impl SourcePlugin for BitgetSource {
    fn company(&self) -> Company {
        Company::Bitget
    }

    fn description(&self) -> &str {
        "Bitget on Mokahr (JSON API first, rendered portal as fallback)"
    }

    async fn fetch(&self, ctx: &SourceContext) -> Result<Vec<JobRecord>> {
        if self.use_api {
            if let Some(probe) = &ctx.probe {
                let records = self.fetch_from_api(probe.as_ref(), ctx).await;
                if !records.is_empty() {
                    return Ok(records);
                }
                info!("Bitget API yielded nothing, falling back to the portal page");
            }
        }

        scrape_listing(ctx, &self.profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LOCATION_NOT_SPECIFIED;
    use crate::plugins::test_support::{offline_context, snapshot_context};
    use crate::probe::ReqwestProbe;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_bare_array_with_aliases() {
        let body = json!([
            {"name": "Risk Analyst", "city": "Hong Kong", "department": "Risk", "id": 42},
            {"title": "Campus Engineer", "location": "Singapore", "team": "Tech", "id": "abc"},
            {"name": "   ", "city": "Tokyo"},
            "not an object"
        ]);

        let records = parse_listing(&body);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Risk Analyst");
        assert_eq!(records[0].location, "Hong Kong");
        assert_eq!(records[0].team, "Risk");
        assert_eq!(records[0].url, format!("{}#/job/42", PORTAL_URL));
        assert_eq!(records[1].location, "Singapore");
        assert_eq!(records[1].url, format!("{}#/job/abc", PORTAL_URL));
    }

    #[test]
    fn test_parse_nested_data_and_missing_fields() {
        let body = json!({"data": [{"name": "Graduate Trader"}]});
        let records = parse_listing(&body);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, LOCATION_NOT_SPECIFIED);
        assert_eq!(records[0].team, "");
        assert_eq!(records[0].url, format!("{}#/job/", PORTAL_URL));
    }

    #[test]
    fn test_parse_unexpected_shapes() {
        assert!(parse_listing(&json!({"jobs": []})).is_empty());
        assert!(parse_listing(&json!({"data": {"list": []}})).is_empty());
        assert!(parse_listing(&json!("ok")).is_empty());
    }

    #[tokio::test]
    async fn test_api_skips_failed_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/first"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/second"))
            .and(header("accept", "application/json"))
            .and(header("referer", PORTAL_URL))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"name": "Security Engineer", "city": "Hong Kong", "id": 1}]
            })))
            .mount(&server)
            .await;

        let ctx = offline_context();
        let probe = ReqwestProbe::new(&ctx.scraper.user_agent).unwrap();
        let source = BitgetSource::new(true)
            .with_endpoints([format!("{}/first", server.uri()), format!("{}/second", server.uri())]);

        let records = source.fetch_from_api(&probe, &ctx).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Security Engineer");
    }

    #[tokio::test]
    async fn test_empty_api_falls_back_to_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let page = r##"
            <html><body><div class="recruitment-jobs">
              <a class="job-card" href="#/job/9"><span>Junior Data Analyst</span><span>Data</span><span>Singapore</span></a>
            </div></body></html>
        "##;
        let probe = Arc::new(ReqwestProbe::new("TestAgent/1.0").unwrap());
        let ctx = snapshot_context("hire-r1.mokahr.com", page).with_probe(probe);
        let source = BitgetSource::new(true)
            .with_endpoints([format!("{}/jobs", server.uri())])
            .with_pacing(Pacing::default());

        let records = source.fetch(&ctx).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Junior Data Analyst");
        assert_eq!(records[0].team, "Data");
        assert_eq!(records[0].location, "Singapore");
        assert_eq!(
            records[0].url,
            "https://hire-r1.mokahr.com/social-recruitment/bitget/100004136?locale=en-US#/job/9"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_without_job_elements_is_error() {
        let ctx = snapshot_context("hire-r1.mokahr.com", "<html><body><p>Maintenance</p></body></html>");
        let result = BitgetSource::new(false).fetch(&ctx).await;

        assert!(result.is_err());
    }
}
