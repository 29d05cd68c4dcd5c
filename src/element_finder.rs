use futures::future::BoxFuture;
use tracing::debug;

use crate::scraper::{Page, PageElement};
use crate::Result;

/// Which step of a cascade produced the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeHit {
    Candidate { index: usize, selector: String },
    Fallback { selector: String },
    Nothing,
}

pub struct CascadeResult {
    pub elements: Vec<Box<dyn PageElement>>,
    pub hit: CascadeHit,
}

/// Ordered candidate selectors plus one broad link pattern tried last.
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    candidates: Vec<String>,
    fallback: Option<String>,
}

/// Evaluate `attempt` for each candidate in order and return the first
/// non-empty result with its index. Failed attempts count as empty.
pub async fn first_non_empty<'a, C, T, F>(
    candidates: &'a [C],
    mut attempt: F,
) -> Option<(usize, Vec<T>)>
where
    C: Sync,
    F: FnMut(&'a C) -> BoxFuture<'a, Result<Vec<T>>>,
{
    for (index, candidate) in candidates.iter().enumerate() {
        match attempt(candidate).await {
            Ok(found) if !found.is_empty() => return Some((index, found)),
            Ok(_) => {}
            Err(e) => debug!("Cascade candidate {} failed: {}", index, e),
        }
    }
    None
}

impl SelectorCascade {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, selector: impl Into<String>) -> Self {
        self.fallback = Some(selector.into());
        self
    }

    /// Resolve the posting elements on `page`. Never fails: a page with no
    /// matching candidate yields an empty result.
    pub async fn resolve(&self, page: &dyn Page) -> CascadeResult {
        let hit = first_non_empty(&self.candidates, |selector| {
            Box::pin(page.query_all(selector))
        })
        .await;

        if let Some((index, elements)) = hit {
            let selector = self.candidates[index].clone();
            debug!("Selector '{}' matched {} elements", selector, elements.len());
            return CascadeResult {
                elements,
                hit: CascadeHit::Candidate { index, selector },
            };
        }

        if let Some(fallback) = &self.fallback {
            match page.query_all(fallback).await {
                Ok(elements) if !elements.is_empty() => {
                    debug!("Fallback selector '{}' matched {} elements", fallback, elements.len());
                    return CascadeResult {
                        elements,
                        hit: CascadeHit::Fallback {
                            selector: fallback.clone(),
                        },
                    };
                }
                Ok(_) => {}
                Err(e) => debug!("Fallback selector '{}' failed: {}", fallback, e),
            }
        }

        CascadeResult {
            elements: Vec::new(),
            hit: CascadeHit::Nothing,
        }
    }
}
