use serde_json::json;
use tokio_test::assert_ok;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use job_aggregator::models::Company;
use job_aggregator::plugins::listing::Pacing;
use job_aggregator::plugins::sources::bitget::PORTAL_URL;
use job_aggregator::plugins::sources::{BinanceSource, BitgetSource, OkxSource};
use job_aggregator::plugins::SourcePlugin;
use job_aggregator::probe::ReqwestProbe;
use job_aggregator::snapshot::SnapshotSessionFactory;

use super::*;

#[tokio::test(start_paused = true)]
async fn test_binance_skips_navigation_links() {
    let ctx = context_for(SnapshotSessionFactory::new().with_page("www.binance.com", fixture("www.binance.com")));

    let records = assert_ok!(BinanceSource::new().fetch(&ctx).await);

    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.url.contains("/job-detail/")));
    assert_eq!(records[3].location, "Shanghai");
    assert_eq!(records[3].team, "Campus");
}

#[tokio::test(start_paused = true)]
async fn test_okx_records_keep_page_order() {
    let ctx = context_for(SnapshotSessionFactory::new().with_page("www.okx.com", fixture("www.okx.com")));

    let records = assert_ok!(OkxSource::new().fetch(&ctx).await);

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Compliance Officer", "Risk Operations Analyst", "Product Designer"]);
    assert_eq!(records[1].team, "");
    assert!(records.iter().all(|r| r.company == Company::Okx));
}

#[tokio::test]
async fn test_bitget_prefers_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api-platform/jobs"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Graduate Compliance Associate", "city": "Hong Kong", "department": "Legal", "id": 311},
            {"title": "Quant Researcher", "location": "Singapore", "id": "q-2"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // No captured page: a fallback to the portal would fail
    let probe = Arc::new(ReqwestProbe::new("TestAgent/1.0").unwrap());
    let ctx = context_for(SnapshotSessionFactory::new()).with_probe(probe);
    let source = BitgetSource::new(true).with_endpoints([format!("{}/api-platform/jobs", server.uri())]);

    let records = source.fetch(&ctx).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].location, "Hong Kong");
    assert_eq!(records[0].team, "Legal");
    assert_eq!(records[0].url, format!("{}#/job/311", PORTAL_URL));
    assert_eq!(records[1].url, format!("{}#/job/q-2", PORTAL_URL));
}

#[tokio::test]
async fn test_bitget_falls_back_when_api_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let probe = Arc::new(ReqwestProbe::new("TestAgent/1.0").unwrap());
    let ctx = context_for(
        SnapshotSessionFactory::new().with_page("hire-r1.mokahr.com", fixture("hire-r1.mokahr.com")),
    )
    .with_probe(probe);
    let source = BitgetSource::new(true)
        .with_endpoints([format!("{}/a", server.uri()), format!("{}/b", server.uri())])
        .with_pacing(Pacing::default());

    let records = source.fetch(&ctx).await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].title, "Junior Data Analyst");
    assert_eq!(records[2].location, "Beijing");
}

#[tokio::test(start_paused = true)]
async fn test_bitget_api_disabled_uses_page() {
    let ctx = context_for(
        SnapshotSessionFactory::new().with_page("hire-r1.mokahr.com", fixture("hire-r1.mokahr.com")),
    );

    let records = BitgetSource::new(false).fetch(&ctx).await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[1].title, "Market Maker (Intern to Full-time)");
    assert_eq!(records[1].team, "Trading");
}
