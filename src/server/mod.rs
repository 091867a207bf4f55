//! HTTP server module
//!
//! This module exposes the checker over HTTP:
//! - `GET /api/check-site-content` streams link and image results
//! - `GET /check-site-urls-stream` streams link results only
//! - `GET /health` reports liveness
//!
//! One worker pool and one redirect fetcher are shared by every request.
//! The resolution cache is either fresh per request or shared, depending on
//! the configured cache scope.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{parse_site_url, CheckQuery, LinksQuery};

use crate::config::{CacheScope, Config};
use crate::extract::PageFetcher;
use crate::pool::WorkerPool;
use crate::resolver::{OutcomeCache, RedirectFetcher, RedirectResolver};
use crate::CheckerError;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// State shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pool: WorkerPool,
    fetcher: Arc<RedirectFetcher>,
    page_fetcher: PageFetcher,
    shared_cache: Option<Arc<OutcomeCache>>,
}

impl AppState {
    /// Builds the shared state from configuration
    ///
    /// Must be called from within a Tokio runtime, since the worker pool
    /// starts its dispatcher immediately.
    pub fn new(config: &Config) -> Result<Self, CheckerError> {
        let fetcher = RedirectFetcher::new(config)?;
        let page_fetcher = PageFetcher::new(config)?;
        let pool = WorkerPool::new(config.resolver.concurrency as usize);

        let shared_cache = match config.cache.scope {
            CacheScope::Request => None,
            CacheScope::Shared => Some(Arc::new(OutcomeCache::bounded(
                config.cache.capacity,
                Duration::from_secs(config.cache.ttl_secs),
            ))),
        };

        Ok(Self {
            pool,
            fetcher: Arc::new(fetcher),
            page_fetcher,
            shared_cache,
        })
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn page_fetcher(&self) -> &PageFetcher {
        &self.page_fetcher
    }

    pub fn shared_cache(&self) -> Option<&Arc<OutcomeCache>> {
        self.shared_cache.as_ref()
    }

    /// A resolver for one request: the shared cache if configured, otherwise
    /// an empty cache that lives as long as the request's report
    pub fn resolver_for_request(&self) -> RedirectResolver {
        let cache = match &self.shared_cache {
            Some(cache) => Arc::clone(cache),
            None => Arc::new(OutcomeCache::unbounded()),
        };

        RedirectResolver::new(Arc::clone(&self.fetcher), cache)
    }
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/check-site-content", get(routes::check_site_content))
        .route("/check-site-urls-stream", get(routes::check_site_urls_stream))
        .route("/health", get(routes::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped
pub async fn serve(config: &Config) -> Result<(), CheckerError> {
    let state = AppState::new(config)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    tracing::info!(
        "Resolving with {} worker(s), cache scope {:?}",
        state.pool().concurrency(),
        config.cache.scope
    );

    axum::serve(listener, router(state))
        .await
        .map_err(|e| CheckerError::Server(e.to_string()))
}
