use async_trait::async_trait;
use std::sync::Arc;

use job_aggregator::aggregator::run_sources;
use job_aggregator::models::{Company, JobRecord, MatchReason};
use job_aggregator::plugins::{SourceContext, SourcePlugin};
use job_aggregator::snapshot::SnapshotSessionFactory;
use job_aggregator::{Aggregator, Result};

use super::*;

#[tokio::test(start_paused = true)]
async fn test_full_run_over_captured_pages() {
    let factory = SnapshotSessionFactory::from_dir(fixtures_dir()).unwrap();
    let aggregator = Aggregator::new(default_plugins().await, context_for(factory));

    let report = aggregator.run().await;

    assert_eq!(report.scraped_count, 10);
    assert_eq!(report.deduplicated_count, 9);
    assert_eq!(report.total_count, 5);
    assert_eq!(report.hong_kong_count, 2);
    assert_eq!(report.graduate_count, 3);
    assert_eq!(report.failed_sources().count(), 0);

    let titles: Vec<&str> = report.jobs.iter().map(|job| job.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Risk Operations Analyst",
            "Graduate Software Engineer",
            "Compliance Officer",
            "Junior Data Analyst",
            "Market Maker (Intern to Full-time)",
        ]
    );

    // The duplicate posting is kept from the first source that listed it
    assert_eq!(report.jobs[0].company, Company::Binance);
    assert_eq!(report.jobs[0].url, "https://www.binance.com/en/careers/job-detail/5001");
    assert_eq!(report.jobs[0].match_reason, Some(MatchReason::HongKong));
    assert_eq!(report.jobs[3].match_reason, Some(MatchReason::GraduateNonMainland));
    assert_eq!(
        report.jobs[3].url,
        "https://hire-r1.mokahr.com/social-recruitment/bitget/100004136?locale=en-US#/job/7f3a"
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_site_contributes_nothing() {
    let factory = SnapshotSessionFactory::new()
        .with_page("www.binance.com", fixture("www.binance.com"))
        .with_page("www.okx.com", fixture("www.okx.com"));
    let aggregator = Aggregator::new(default_plugins().await, context_for(factory));

    let report = aggregator.run().await;

    let failed: Vec<Company> = report.failed_sources().map(|outcome| outcome.source).collect();
    assert_eq!(failed, vec![Company::Bitget]);
    assert_eq!(report.total_count, 3);
    assert_eq!(report.jobs_for(Company::Bitget).count(), 0);
    assert_eq!(report.sources.len(), 3);
}

struct PanickingSource;

#[async_trait]
impl SourcePlugin for PanickingSource {
    fn company(&self) -> Company {
        Company::Okx
    }

    fn description(&self) -> &str {
        "panics mid-scrape"
    }

    async fn fetch(&self, _ctx: &SourceContext) -> Result<Vec<JobRecord>> {
        panic!("selector engine crashed");
    }
}

#[tokio::test(start_paused = true)]
async fn test_panicking_source_is_contained() {
    let factory = SnapshotSessionFactory::new().with_page("www.binance.com", fixture("www.binance.com"));
    let plugins: Vec<Arc<dyn SourcePlugin>> = vec![
        Arc::new(job_aggregator::plugins::sources::BinanceSource::new()),
        Arc::new(PanickingSource),
    ];

    let report = run_sources(plugins, context_for(factory)).await;

    assert_eq!(report.total_count, 2);
    let okx = report
        .sources
        .iter()
        .find(|outcome| outcome.source == Company::Okx)
        .unwrap();
    assert!(!okx.is_success());
    assert_eq!(okx.records, 0);
}

#[tokio::test(start_paused = true)]
async fn test_report_json_output() {
    let factory = SnapshotSessionFactory::from_dir(fixtures_dir()).unwrap();
    let report = Aggregator::new(default_plugins().await, context_for(factory))
        .run()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output").join("jobs.json");
    report.write_json(&path).unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["total_count"], 5);
    assert_eq!(json["jobs"][0]["company"], "Binance");
    assert_eq!(json["jobs"][0]["match_reason"], "Location: Hong Kong");
    assert_eq!(json["jobs"][1]["match_reason"], "Graduate position (non-mainland)");
    assert_eq!(json["jobs"][2]["company"], "OKX");
}
