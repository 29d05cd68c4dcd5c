pub mod aggregator;
pub mod config;
pub mod core;
pub mod element_finder;
pub mod extractor;
pub mod models;
pub mod plugins;
pub mod probe;
pub mod scraper;
pub mod snapshot;
pub mod utils;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use config::AppConfig;
pub use models::{Company, JobRecord, MatchReason, RunReport};
pub use utils::error::{AppError, Result};
