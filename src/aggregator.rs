use futures::future::join_all;

use crate::core::{classify, deduplicate};
use crate::models::{JobRecord, RunReport, SourceOutcome};
use crate::plugins::manager::SourcePluginRef;
use crate::plugins::{PluginManager, SourceContext};
use crate::AppError;

/// Runs every registered source concurrently and turns their combined
/// output into a classified report.
pub struct Aggregator {
    plugins: PluginManager,
    context: SourceContext,
}

impl Aggregator {
    pub fn new(plugins: PluginManager, context: SourceContext) -> Self {
        Self { plugins, context }
    }

    /// Never fails: a source that errors or panics contributes zero records
    /// and is reported in `RunReport::sources`.
    pub async fn run(&self) -> RunReport {
        let sources = self.plugins.sources().await;
        tracing::info!("Scraping {} sources", sources.len());

        let handles = sources.into_iter().map(|source| {
            let context = self.context.clone();
            let name = source.name();
            let company = source.company();
            let handle = tokio::spawn(async move { scrape_source(source, context).await });
            async move {
                match handle.await {
                    Ok(result) => result,
                    Err(e) => {
                        let error = AppError::Source {
                            source_name: name.to_string(),
                            message: format!("task aborted: {}", e),
                        };
                        tracing::error!("{}", error);
                        metrics::counter!("job_aggregator_source_failures_total", "source" => name).increment(1);
                        (Vec::new(), SourceOutcome::failed(company, error.to_string()))
                    }
                }
            }
        });

        let mut raw = Vec::new();
        let mut outcomes = Vec::new();
        for (records, outcome) in join_all(handles).await {
            raw.extend(records);
            outcomes.push(outcome);
        }

        let report = process(raw, outcomes);
        tracing::info!(
            "Kept {} of {} unique jobs ({} Hong Kong, {} graduate)",
            report.total_count,
            report.deduplicated_count,
            report.hong_kong_count,
            report.graduate_count
        );
        report
    }
}

/// Run one source, containing any failure at the source boundary.
pub async fn scrape_source(source: SourcePluginRef, context: SourceContext) -> (Vec<JobRecord>, SourceOutcome) {
    let name = source.name();
    let company = source.company();
    let started = tokio::time::Instant::now();

    match source.fetch(&context).await {
        Ok(records) => {
            tracing::info!("{}: scraped {} jobs in {:?}", name, records.len(), started.elapsed());
            metrics::counter!("job_aggregator_records_scraped_total", "source" => name)
                .increment(records.len() as u64);
            let outcome = SourceOutcome::succeeded(company, records.len());
            (records, outcome)
        }
        Err(e) => {
            tracing::warn!("{}: scrape failed, contributing no jobs: {}", name, e);
            metrics::counter!("job_aggregator_source_failures_total", "source" => name).increment(1);
            (Vec::new(), SourceOutcome::failed(company, e.to_string()))
        }
    }
}

/// Deduplicate then classify the concatenated raw records.
pub fn process(raw: Vec<JobRecord>, sources: Vec<SourceOutcome>) -> RunReport {
    let scraped_count = raw.len();
    let unique = deduplicate(raw);
    let deduplicated_count = unique.len();
    let kept = classify(unique);
    RunReport::new(kept, sources, scraped_count, deduplicated_count)
}

/// Convenience for callers holding plugins directly.
pub async fn run_sources(plugins: Vec<SourcePluginRef>, context: SourceContext) -> RunReport {
    let manager = PluginManager::new();
    for plugin in plugins {
        manager.register_source(plugin).await;
    }
    Aggregator::new(manager, context).run().await
}
