use async_trait::async_trait;
use headless_chrome::protocol::cdp::DOM::NodeId;
use headless_chrome::util::Timeout as WaitTimeout;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ScraperConfig;
use crate::{AppError, Result};

/// Scrolls the document to the bottom to trigger lazy loading.
pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    DomContentLoaded,
    NetworkIdle,
}

/// A rendered element on a live page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageElement: Send + Sync {
    async fn inner_text(&self) -> Result<String>;
    async fn attribute(&self, name: &str) -> Result<Option<String>>;
    /// First descendant matching `selector`, if any.
    async fn query_first(&self, selector: &str) -> Result<Option<Box<dyn PageElement>>>;
    async fn click(&self) -> Result<()>;
}

/// One page-automation session, owned by exactly one source for its lifetime.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Page: Send + Sync {
    async fn navigate(&self, url: &str, wait: WaitCondition, timeout: Duration) -> Result<()>;
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>>;
    async fn evaluate(&self, expression: &str) -> Result<()>;
    async fn close(&self) -> Result<()>;
}

/// Opens fresh, unshared sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn Page>>;
}

pub struct ChromeSessionFactory {
    config: ScraperConfig,
}

pub struct ChromeSession {
    // Dropping the browser kills the Chrome process
    _browser: Browser,
    tab: Arc<Tab>,
    default_timeout: Duration,
}

pub struct ChromeElement {
    tab: Arc<Tab>,
    node_id: NodeId,
    default_timeout: Duration,
}

impl ChromeSessionFactory {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    fn launch(config: &ScraperConfig) -> anyhow::Result<(Browser, Arc<Tab>)> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false) // Often needed in containerized environments
            .idle_browser_timeout(config.navigation_timeout() * 2)
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
                OsStr::new("--disable-background-timer-throttling"),
                OsStr::new("--disable-backgrounding-occluded-windows"),
                OsStr::new("--disable-renderer-backgrounding"),
            ])
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create launch options: {}", e))?;

        // Set Chrome path if provided
        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)?;
        let tab = browser.new_tab()?;
        tab.set_user_agent(&config.user_agent, None, None)?;
        tab.set_default_timeout(config.navigation_timeout());

        Ok((browser, tab))
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn open(&self) -> Result<Box<dyn Page>> {
        let config = self.config.clone();
        let default_timeout = config.navigation_timeout();
        let (browser, tab) = blocking("launch browser", move || Self::launch(&config)).await?;

        Ok(Box::new(ChromeSession {
            _browser: browser,
            tab,
            default_timeout,
        }))
    }
}

#[async_trait]
impl Page for ChromeSession {
    async fn navigate(&self, url: &str, wait: WaitCondition, timeout: Duration) -> Result<()> {
        let tab = Arc::clone(&self.tab);
        let target = url.to_string();
        let navigation = blocking("navigate", move || {
            tab.navigate_to(&target)?;
            tab.wait_until_navigated()?;
            if wait == WaitCondition::NetworkIdle {
                // No network-idle event is exposed; wait for the document to settle instead
                tab.wait_for_element("body")?;
            }
            Ok(())
        });

        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AppError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(AppError::timeout(format!("navigate {}", url), timeout)),
        }
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        let tab = Arc::clone(&self.tab);
        let selector_owned = selector.to_string();
        let appeared = blocking("wait for selector", move || {
            element_appeared(
                tab.wait_for_element_with_custom_timeout(&selector_owned, timeout)
                    .map(|_| ()),
            )
        })
        .await?;

        if !appeared {
            return Err(AppError::timeout(format!("wait for '{}'", selector), timeout));
        }
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>> {
        let tab = Arc::clone(&self.tab);
        let selector_owned = selector.to_string();
        let node_ids = with_timeout(
            format!("query '{}'", selector),
            self.default_timeout,
            blocking("query selector", move || {
                let elements = tab.find_elements(&selector_owned)?;
                Ok(elements.iter().map(|element| element.node_id).collect::<Vec<_>>())
            }),
        )
        .await?;

        Ok(node_ids
            .into_iter()
            .map(|node_id| {
                Box::new(ChromeElement {
                    tab: Arc::clone(&self.tab),
                    node_id,
                    default_timeout: self.default_timeout,
                }) as Box<dyn PageElement>
            })
            .collect())
    }

    async fn evaluate(&self, expression: &str) -> Result<()> {
        let tab = Arc::clone(&self.tab);
        let expression_owned = expression.to_string();
        with_timeout(
            "evaluate script",
            self.default_timeout,
            blocking("evaluate", move || {
                tab.evaluate(&expression_owned, false)?;
                Ok(())
            }),
        )
        .await
    }

    async fn close(&self) -> Result<()> {
        let tab = Arc::clone(&self.tab);
        blocking("close tab", move || {
            tab.close(true)?;
            Ok(())
        })
        .await
    }
}

impl ChromeElement {
    async fn with_element<T, F>(&self, operation: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Element<'_>) -> anyhow::Result<T> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        let node_id = self.node_id;
        with_timeout(
            operation,
            self.default_timeout,
            blocking(operation, move || {
                let element = Element::new(&tab, node_id)?;
                f(&element)
            }),
        )
        .await
    }
}

#[async_trait]
impl PageElement for ChromeElement {
    async fn inner_text(&self) -> Result<String> {
        self.with_element("inner text", |element| element.get_inner_text())
            .await
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let name = name.to_string();
        self.with_element("read attribute", move |element| {
            element.get_attribute_value(&name)
        })
        .await
    }

    async fn query_first(&self, selector: &str) -> Result<Option<Box<dyn PageElement>>> {
        let selector = selector.to_string();
        let found = self
            .with_element("query descendant", move |element| {
                Ok(element.find_element(&selector).ok().map(|child| child.node_id))
            })
            .await?;

        Ok(found.map(|node_id| {
            Box::new(ChromeElement {
                tab: Arc::clone(&self.tab),
                node_id,
                default_timeout: self.default_timeout,
            }) as Box<dyn PageElement>
        }))
    }

    async fn click(&self) -> Result<()> {
        self.with_element("click", |element| {
            element.click()?;
            Ok(())
        })
        .await
    }
}

/// `Ok(false)` when the wait ran out of time; any other failure is passed on.
fn element_appeared(waited: anyhow::Result<()>) -> anyhow::Result<bool> {
    match waited {
        Ok(()) => Ok(true),
        Err(e) if e.is::<WaitTimeout>() => Ok(false),
        Err(e) => Err(e),
    }
}

/// headless_chrome is synchronous; keep it off the async worker threads.
async fn blocking<T, F>(operation: &'static str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Browser(format!("{} task failed: {}", operation, e)))?
        .map_err(|e| AppError::Browser(format!("{} failed: {}", operation, e)))
}

async fn with_timeout<T>(
    operation: impl Into<String>,
    after: Duration,
    future: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(after, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout(operation, after)),
    }
}
