//! Offline page sessions over captured HTML.
//!
//! Each captured page is looked up by the host of the navigated URL
//! (`www.okx.com` -> `www.okx.com.html`). Selectors are evaluated with the
//! `scraper` crate, so only standard CSS is supported. Scrolling and clicking
//! have no effect on a static document.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::scraper::{Page, PageElement, SessionFactory, WaitCondition};
use crate::{AppError, Result};

#[derive(Debug, Clone, Default)]
pub struct SnapshotSessionFactory {
    pages: Arc<HashMap<String, String>>,
}

pub struct SnapshotPage {
    pages: Arc<HashMap<String, String>>,
    current: RwLock<Option<String>>,
}

/// Owned copy of a matched element; `scraper::Html` is not `Send`.
#[derive(Debug, Clone)]
pub struct SnapshotElement {
    text: String,
    attributes: HashMap<String, String>,
    outer_html: String,
}

impl SnapshotSessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register captured HTML for a host.
    pub fn with_page(mut self, host: impl Into<String>, html: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.pages).insert(host.into(), html.into());
        self
    }

    /// Load every `<host>.html` file in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut factory = Self::new();
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path: PathBuf = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
                continue;
            }
            if let Some(host) = path.file_stem().and_then(|stem| stem.to_str()) {
                let html = std::fs::read_to_string(&path)?;
                tracing::debug!("Loaded snapshot for {} from {}", host, path.display());
                factory = factory.with_page(host.to_string(), html);
            }
        }
        Ok(factory)
    }

    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.pages.keys().cloned().collect();
        hosts.sort();
        hosts
    }
}

#[async_trait]
impl SessionFactory for SnapshotSessionFactory {
    async fn open(&self) -> Result<Box<dyn Page>> {
        Ok(Box::new(SnapshotPage {
            pages: Arc::clone(&self.pages),
            current: RwLock::new(None),
        }))
    }
}

impl SnapshotPage {
    fn current_html(&self) -> Result<String> {
        self.current
            .read()
            .map_err(|_| AppError::Internal("snapshot page lock poisoned".to_string()))?
            .clone()
            .ok_or_else(|| AppError::Browser("no page loaded".to_string()))
    }
}

#[async_trait]
impl Page for SnapshotPage {
    async fn navigate(&self, url: &str, _wait: WaitCondition, _timeout: Duration) -> Result<()> {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .ok_or_else(|| AppError::Navigation {
                url: url.to_string(),
                message: "URL has no host".to_string(),
            })?;

        let html = self.pages.get(&host).ok_or_else(|| AppError::Navigation {
            url: url.to_string(),
            message: format!("no snapshot captured for {}", host),
        })?;

        let mut current = self
            .current
            .write()
            .map_err(|_| AppError::Internal("snapshot page lock poisoned".to_string()))?;
        *current = Some(html.clone());
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        let html = self.current_html()?;
        if select_elements(&html, selector, false)?.is_empty() {
            return Err(AppError::timeout(format!("wait for '{}'", selector), timeout));
        }
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>> {
        let html = self.current_html()?;
        Ok(select_elements(&html, selector, false)?
            .into_iter()
            .map(|element| Box::new(element) as Box<dyn PageElement>)
            .collect())
    }

    async fn evaluate(&self, _expression: &str) -> Result<()> {
        self.current_html().map(|_| ())
    }

    async fn close(&self) -> Result<()> {
        if let Ok(mut current) = self.current.write() {
            *current = None;
        }
        Ok(())
    }
}

#[async_trait]
impl PageElement for SnapshotElement {
    async fn inner_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.attributes.get(name).cloned())
    }

    async fn query_first(&self, selector: &str) -> Result<Option<Box<dyn PageElement>>> {
        Ok(select_elements(&self.outer_html, selector, true)?
            .into_iter()
            .next()
            .map(|element| Box::new(element) as Box<dyn PageElement>))
    }

    async fn click(&self) -> Result<()> {
        Ok(())
    }
}

fn select_elements(html: &str, selector: &str, fragment: bool) -> Result<Vec<SnapshotElement>> {
    let parsed = Selector::parse(selector).map_err(|_| AppError::Selector {
        selector: selector.to_string(),
    })?;

    let document = if fragment {
        Html::parse_fragment(html)
    } else {
        Html::parse_document(html)
    };

    let mut elements: Vec<SnapshotElement> = document.select(&parsed).map(snapshot_of).collect();
    if fragment {
        // A fragment query searches descendants only, not the element itself
        elements.retain(|element| element.outer_html != html);
    }
    Ok(elements)
}

fn snapshot_of(element: ElementRef<'_>) -> SnapshotElement {
    // Each non-empty text node is treated as one rendered line
    let text = element
        .text()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let attributes = element
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    SnapshotElement {
        text,
        attributes,
        outer_html: element.html(),
    }
}
