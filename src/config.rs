use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::models::Company;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub sources: SourcesConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub chrome_path: Option<String>,
    pub headless: bool,
    pub navigation_timeout: u64,
    pub request_timeout: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub binance: SourceSettings,
    pub okx: SourceSettings,
    pub bitget: BitgetSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitgetSettings {
    pub enabled: bool,
    pub use_api: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
    pub json_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub file: Option<String>,
}

impl ScraperConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl SourcesConfig {
    pub fn is_enabled(&self, company: Company) -> bool {
        match company {
            Company::Binance => self.binance.enabled,
            Company::Okx => self.okx.enabled,
            Company::Bitget => self.bitget.enabled,
        }
    }

    pub fn enabled(&self) -> Vec<Company> {
        Company::ALL
            .into_iter()
            .filter(|company| self.is_enabled(*company))
            .collect()
    }
}

impl OutputConfig {
    pub fn json_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.json_file)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig {
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                chrome_path: None,
                headless: true,
                navigation_timeout: 60,
                request_timeout: 30,
                retry_attempts: 1,
                retry_delay_ms: 2000,
            },
            sources: SourcesConfig {
                binance: SourceSettings { enabled: true },
                okx: SourceSettings { enabled: true },
                bitget: BitgetSettings {
                    enabled: true,
                    use_api: true,
                },
            },
            output: OutputConfig {
                dir: "output".to_string(),
                json_file: "jobs.json".to_string(),
            },
            logging: LoggingConfig {
                filter: "job_aggregator=info".to_string(),
                file: None,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::builder_with_defaults()?
            // Add default configuration file
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "JOBAGG_"
            .add_source(Environment::with_prefix("JOBAGG").separator("__"));

        Self::finish(builder.build()?)
    }

    /// Load a single configuration file on top of the built-in defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::builder_with_defaults()?
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("JOBAGG").separator("__"));

        Self::finish(builder.build()?)
    }

    fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Config::try_from(&AppConfig::default())?;
        Ok(Config::builder().add_source(defaults))
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let mut config: AppConfig = settings.try_deserialize()?;

        // Add Chrome path from environment if not set
        if config.scraper.chrome_path.is_none() {
            config.scraper.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate scraper configuration
        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Scraper user_agent must not be empty".into()));
        }

        if self.scraper.navigation_timeout == 0 {
            return Err(ConfigError::Message("Scraper navigation_timeout must be greater than 0".into()));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message("Scraper request_timeout must be greater than 0".into()));
        }

        // Validate sources configuration
        if self.sources.enabled().is_empty() {
            return Err(ConfigError::Message("At least one source must be enabled".into()));
        }

        // Validate output configuration
        if self.output.json_file.trim().is_empty() {
            return Err(ConfigError::Message("Output json_file must not be empty".into()));
        }

        // Validate logging configuration
        if EnvFilter::try_new(&self.logging.filter).is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid logging filter: {}",
                self.logging.filter
            )));
        }

        Ok(())
    }
}
