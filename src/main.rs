use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use job_aggregator::config::LoggingConfig;
use job_aggregator::plugins::{PluginManager, SourceContext};
use job_aggregator::probe::ReqwestProbe;
use job_aggregator::scraper::{ChromeSessionFactory, SessionFactory};
use job_aggregator::snapshot::SnapshotSessionFactory;
use job_aggregator::{Aggregator, AppConfig, Company};

#[derive(Debug, Parser)]
#[command(name = "job-aggregator", version, about = "Collect Hong Kong and graduate job openings from exchange career sites")]
struct Cli {
    /// Configuration file (defaults to config/default.toml and friends)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides output.dir
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only scrape these sources (Binance, OKX, Bitget)
    #[arg(short, long = "source", value_name = "NAME")]
    sources: Vec<String>,

    /// Read captured `<host>.html` pages instead of driving Chrome
    #[arg(long, value_name = "DIR")]
    snapshot_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::from_env().context("loading configuration")?,
    };
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.display().to_string();
    }

    let _guard = init_tracing(&config.logging)?;
    info!("Starting job aggregator...");

    let only = parse_sources(&cli.sources)?;

    let sessions: Arc<dyn SessionFactory> = match &cli.snapshot_dir {
        Some(dir) => {
            let factory = SnapshotSessionFactory::from_dir(dir)
                .with_context(|| format!("reading snapshots from {}", dir.display()))?;
            info!("Using captured pages for {:?}", factory.hosts());
            Arc::new(factory)
        }
        None => Arc::new(ChromeSessionFactory::new(config.scraper.clone())),
    };

    let mut context = SourceContext::new(sessions, config.scraper.clone());
    if cli.snapshot_dir.is_none() {
        let probe = ReqwestProbe::new(&config.scraper.user_agent).context("building HTTP client")?;
        context = context.with_probe(Arc::new(probe));
    }

    let plugins = PluginManager::new();
    plugins.initialize_default_plugins(&config.sources).await;
    if !only.is_empty() {
        plugins.retain(&only).await;
    }
    let names = plugins.list_sources().await;
    if names.is_empty() {
        warn!("No enabled source matches the requested sources");
    }
    info!("Sources: {}", names.join(", "));

    let report = Aggregator::new(plugins, context).run().await;
    for outcome in report.failed_sources() {
        warn!(
            "{} contributed no jobs: {}",
            outcome.source,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    let path = config.output.json_path();
    report
        .write_json(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {} jobs to {}", report.total_count, path.display());

    Ok(())
}

fn parse_sources(names: &[String]) -> Result<Vec<Company>> {
    names
        .iter()
        .map(|name| {
            Company::from_name(name).with_context(|| format!("unknown source '{}'", name))
        })
        .collect()
}

/// `RUST_LOG` takes precedence over the configured filter.
fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.filter))
    };

    let stdout = tracing_subscriber::fmt::layer().with_filter(filter()?);

    match &logging.file {
        Some(file) => {
            let path = PathBuf::from(file);
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .context("logging.file has no file name")?
                .to_owned();
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter()?);

            tracing_subscriber::registry().with(stdout).with(file_layer).init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(stdout).init();
            Ok(None)
        }
    }
}
