//! URL resolution cache
//!
//! Maps an absolute URL to the outcome of resolving it, so that identical
//! URLs are only requested once. Safe to share between tasks. There is no
//! atomic check-then-insert: two tasks racing on the same URL may both
//! resolve it, and the last write wins.

use crate::resolver::outcome::ResolutionOutcome;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// A cached outcome with the time it was stored
#[derive(Debug, Clone)]
pub struct CachedOutcome {
    pub outcome: ResolutionOutcome,
    pub stored_at: DateTime<Utc>,
}

impl CachedOutcome {
    pub fn new(outcome: ResolutionOutcome) -> Self {
        Self {
            outcome,
            stored_at: Utc::now(),
        }
    }

    /// Checks if the entry is older than `ttl`
    pub fn is_stale(&self, ttl: Duration) -> bool {
        Utc::now() - self.stored_at > ttl
    }
}

/// Concurrent URL → outcome cache
///
/// Built either unbounded (for a cache that lives as long as one request) or
/// bounded with a capacity and time-to-live (for a cache shared between
/// requests).
#[derive(Debug)]
pub struct OutcomeCache {
    entries: DashMap<String, CachedOutcome>,
    capacity: Option<usize>,
    ttl: Option<Duration>,
}

impl Default for OutcomeCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl OutcomeCache {
    /// Creates a cache with no eviction
    pub fn unbounded() -> Self {
        Self {
            entries: DashMap::new(),
            capacity: None,
            ttl: None,
        }
    }

    /// Creates a cache holding at most `capacity` entries, each for at most `ttl`
    pub fn bounded(capacity: usize, ttl: std::time::Duration) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(36_500));
        Self {
            entries: DashMap::with_capacity(capacity.min(1024)),
            capacity: Some(capacity.max(1)),
            ttl: Some(ttl),
        }
    }

    /// Looks up a URL
    ///
    /// Expired entries are removed and reported as absent.
    pub fn get(&self, url: &str) -> Option<ResolutionOutcome> {
        let entry = self.entries.get(url)?;

        if let Some(ttl) = self.ttl {
            if entry.is_stale(ttl) {
                // Release the read guard before taking the write lock on the shard
                drop(entry);
                self.remove_stale(url, ttl);
                return None;
            }
        }

        Some(entry.outcome.clone())
    }

    /// Stores an outcome, replacing any previous one for the URL
    pub fn put(&self, url: &str, outcome: ResolutionOutcome) {
        if let Some(capacity) = self.capacity {
            if !self.entries.contains_key(url) && self.entries.len() >= capacity {
                self.evict_oldest();
            }
        }

        self.entries.insert(url.to_string(), CachedOutcome::new(outcome));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Removes the entry for `url` only if it is still stale
    ///
    /// A writer may store a fresh outcome between the staleness check in
    /// `get` and this call; that entry is kept.
    fn remove_stale(&self, url: &str, ttl: Duration) {
        if self.entries.remove_if(url, |_, entry| entry.is_stale(ttl)).is_some() {
            tracing::trace!("Cache entry expired for {}", url);
        }
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().stored_at)
            .map(|entry| entry.key().clone());

        if let Some(url) = oldest {
            tracing::trace!("Evicting cache entry for {}", url);
            self.entries.remove(&url);
        }
    }
}
