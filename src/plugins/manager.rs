use std::sync::Arc;
use tokio::sync::RwLock;

use super::sources::{BinanceSource, BitgetSource, OkxSource};
use super::traits::SourcePlugin;
use crate::config::SourcesConfig;
use crate::models::Company;

pub type SourcePluginRef = Arc<dyn SourcePlugin>;

/// Registry of the sources that take part in a run, in registration order.
#[derive(Clone)]
pub struct PluginManager {
    sources: Arc<RwLock<Vec<SourcePluginRef>>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            sources: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a source plugin. A later registration for the same company
    /// replaces the earlier one in place.
    pub async fn register_source(&self, plugin: SourcePluginRef) {
        let mut sources = self.sources.write().await;
        match sources.iter_mut().find(|existing| existing.company() == plugin.company()) {
            Some(existing) => {
                tracing::debug!("Replacing source plugin {}", plugin.name());
                *existing = plugin;
            }
            None => sources.push(plugin),
        }
    }

    /// Check if a source plugin is registered
    pub async fn has_source(&self, company: Company) -> bool {
        let sources = self.sources.read().await;
        sources.iter().any(|source| source.company() == company)
    }

    /// List registered source names
    pub async fn list_sources(&self) -> Vec<String> {
        let sources = self.sources.read().await;
        sources.iter().map(|source| source.name().to_string()).collect()
    }

    pub async fn sources(&self) -> Vec<SourcePluginRef> {
        self.sources.read().await.clone()
    }

    /// Drop every source not in `keep`.
    pub async fn retain(&self, keep: &[Company]) {
        let mut sources = self.sources.write().await;
        sources.retain(|source| keep.contains(&source.company()));
    }

    /// Register the built-in sources enabled in `config`
    pub async fn initialize_default_plugins(&self, config: &SourcesConfig) {
        for company in config.enabled() {
            let plugin: SourcePluginRef = match company {
                Company::Binance => Arc::new(BinanceSource::new()),
                Company::Okx => Arc::new(OkxSource::new()),
                Company::Bitget => Arc::new(BitgetSource::new(config.bitget.use_api)),
            };
            self.register_source(plugin).await;
        }
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
