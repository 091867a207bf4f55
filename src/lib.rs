//! Site-Checker: streaming link and image checker
//!
//! This crate fetches a single web page, extracts its links and images, and
//! resolves the final destination of every link through a bounded, retrying,
//! cached redirect resolver. Results are streamed to the caller as
//! Server-Sent Events in completion order.

pub mod config;
pub mod extract;
pub mod pool;
pub mod report;
pub mod resolver;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Checker operations
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid site URL '{url}': {message}")]
    InvalidSiteUrl { url: String, message: String },

    #[error("Failed to fetch {url}: {message}")]
    PageFetch { url: String, message: String },

    #[error("Failed to fetch {url}: Request failed with status code {status}")]
    PageStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Site-Checker operations
pub type Result<T> = std::result::Result<T, CheckerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract, ExtractOptions, Extracted, ImageCandidate, LinkCandidate};
pub use pool::WorkerPool;
pub use report::{ReportEvent, ReportedResult, Reporter};
pub use resolver::{OutcomeCache, RedirectFetcher, RedirectResolver, ResolutionOutcome};
