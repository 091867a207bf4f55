//! Redirect resolution module
//!
//! This module resolves link URLs to their final destination:
//! - Caching outcomes per URL
//! - Fetching with a bounded retry policy
//! - Classifying failures into degraded outcomes

mod cache;
mod fetcher;
mod outcome;

pub use cache::{CachedOutcome, OutcomeCache};
pub use fetcher::{FetchError, RedirectFetcher, RetryPolicy};
pub use outcome::{FinalUrl, ResolutionOutcome, StatusCode};

use std::sync::Arc;

/// Cache-checked, retrying resolution of one URL
///
/// The cache is owned by the caller: pass a fresh one to scope reuse to a
/// single request, or share one across requests.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    fetcher: Arc<RedirectFetcher>,
    cache: Arc<OutcomeCache>,
}

impl RedirectResolver {
    pub fn new(fetcher: Arc<RedirectFetcher>, cache: Arc<OutcomeCache>) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &Arc<OutcomeCache> {
        &self.cache
    }

    /// Resolves a URL, consulting the cache first
    ///
    /// A cache hit returns without touching the network. On a miss the
    /// outcome is fetched and stored before being returned, degraded outcomes
    /// included, so a known-bad URL is not retried again within the cache's
    /// lifetime. This never fails: errors become the `"Error"` outcome.
    pub async fn resolve(&self, url: &str) -> ResolutionOutcome {
        if let Some(outcome) = self.cache.get(url) {
            tracing::debug!("Cache hit for {}", url);
            return outcome;
        }

        let outcome = match self.fetcher.fetch(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Resolution failed: {}", e);
                ResolutionOutcome::error()
            }
        };

        self.cache.put(url, outcome.clone());
        outcome
    }
}
