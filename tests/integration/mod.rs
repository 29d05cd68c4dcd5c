// Shared helpers for integration tests

pub mod pipeline_tests;
pub mod source_tests;

use std::path::PathBuf;
use std::sync::Arc;

use job_aggregator::config::AppConfig;
use job_aggregator::plugins::{PluginManager, SourceContext};
use job_aggregator::snapshot::SnapshotSessionFactory;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn fixture(host: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(format!("{}.html", host)))
        .unwrap_or_else(|e| panic!("missing fixture for {}: {}", host, e))
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.scraper.retry_attempts = 0;
    config
}

pub fn context_for(factory: SnapshotSessionFactory) -> SourceContext {
    SourceContext::new(Arc::new(factory), test_config().scraper)
}

pub async fn default_plugins() -> PluginManager {
    let plugins = PluginManager::new();
    plugins.initialize_default_plugins(&test_config().sources).await;
    plugins
}
