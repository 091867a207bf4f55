//! Retrying redirect fetcher
//!
//! Issues a GET for a URL, lets the HTTP client follow redirects up to a cap,
//! and reports where the chain ended.
//!
//! # Retry Logic
//!
//! | Condition                         | Action                                   |
//! |-----------------------------------|------------------------------------------|
//! | Status 200–399                    | Immediate → resolved outcome             |
//! | Status < 200 or ≥ 400             | Immediate → outcome with that status     |
//! | Redirect chain over the cap       | Immediate → `FetchError::TooManyRedirects` |
//! | Unusable URL (bad scheme, etc.)   | Immediate → `FetchError::Request`        |
//! | Connect / timeout / reset / other | Retry after a constant backoff           |
//!
//! After the last attempt, a connection reset becomes the
//! `"Connection reset"` outcome and any other transport failure is returned
//! as `FetchError::Transport`.

use crate::config::Config;
use crate::resolver::outcome::{FinalUrl, ResolutionOutcome, StatusCode};
use reqwest::{redirect::Policy, Client, Response};
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Errors that survive the retry loop
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Too many redirects from {url}")]
    TooManyRedirects { url: String },

    #[error("Invalid request for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {url} after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// How many times to try a URL and how long to wait between tries
///
/// The delay is constant: no exponential growth, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (1 = no retry)
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A single attempt with no retry
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// What to do about a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    TooManyRedirects,
    Request,
    Transport,
}

impl FailureKind {
    fn of(error: &reqwest::Error) -> Self {
        if error.is_redirect() {
            Self::TooManyRedirects
        } else if error.is_builder() {
            Self::Request
        } else {
            Self::Transport
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport)
    }
}

/// Resolves the final URL of a link, retrying transport failures
#[derive(Debug, Clone)]
pub struct RedirectFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl RedirectFetcher {
    /// Builds a fetcher from the resolver and user agent settings
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_checker::config::Config;
    /// use site_checker::resolver::RedirectFetcher;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = RedirectFetcher::new(&Config::default())?;
    /// let outcome = fetcher.fetch("https://example.com/old-path").await?;
    /// println!("{} ({})", outcome.final_url, outcome.status_code);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let resolver = &config.resolver;

        let client = Client::builder()
            .user_agent(config.user_agent.header_value())
            .timeout(Duration::from_secs(resolver.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(resolver.max_redirects as usize))
            .gzip(true)
            .brotli(true)
            .build()?;

        let policy = RetryPolicy::new(
            resolver.max_attempts,
            Duration::from_millis(resolver.retry_backoff_ms),
        );

        Ok(Self::with_client(client, policy))
    }

    /// Uses an existing client; its redirect policy sets the redirect cap
    pub fn with_client(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches a URL and reports where its redirect chain ends
    ///
    /// # Returns
    ///
    /// * `Ok(ResolutionOutcome)` - A terminal response (any status), or a
    ///   connection reset on the last attempt
    /// * `Err(FetchError)` - Every attempt failed, or the failure was not retryable
    pub async fn fetch(&self, url: &str) -> Result<ResolutionOutcome, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            tracing::trace!("GET {} (attempt {}/{})", url, attempt, max_attempts);

            let error = match self.client.get(url).send().await {
                Ok(response) => return Ok(outcome_from_response(url, &response)),
                Err(error) => error,
            };

            let kind = FailureKind::of(&error);
            if !kind.is_retryable() || attempt >= max_attempts {
                return final_failure(url, error, kind, attempt);
            }

            tracing::warn!(
                "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                attempt,
                max_attempts,
                url,
                error,
                self.policy.backoff
            );
            tokio::time::sleep(self.policy.backoff).await;
            attempt += 1;
        }
    }
}

/// Any response is terminal; only its status decides success
fn outcome_from_response(url: &str, response: &Response) -> ResolutionOutcome {
    let status = response.status().as_u16();
    let final_url = response.url().as_str();

    if (200..400).contains(&status) {
        tracing::debug!("{} resolved to {} ({})", url, final_url, status);
        return ResolutionOutcome::resolved(final_url, status);
    }

    tracing::debug!("{} ended with HTTP {} at {}", url, status, final_url);
    ResolutionOutcome {
        final_url: if final_url.is_empty() {
            FinalUrl::NoFinalUrl
        } else {
            FinalUrl::Resolved(final_url.to_string())
        },
        status_code: StatusCode::Code(status),
    }
}

fn final_failure(
    url: &str,
    error: reqwest::Error,
    kind: FailureKind,
    attempts: u32,
) -> Result<ResolutionOutcome, FetchError> {
    match kind {
        FailureKind::TooManyRedirects => Err(FetchError::TooManyRedirects {
            url: url.to_string(),
        }),
        FailureKind::Request => Err(FetchError::Request {
            url: url.to_string(),
            source: error,
        }),
        FailureKind::Transport if is_connection_reset(&error) => {
            tracing::debug!("Connection reset for {} after {} attempt(s)", url, attempts);
            Ok(ResolutionOutcome::connection_reset())
        }
        FailureKind::Transport => Err(FetchError::Transport {
            url: url.to_string(),
            attempts,
            source: error,
        }),
    }
}

/// Walks the error's source chain looking for an I/O connection reset
fn is_connection_reset(error: &reqwest::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionReset {
                return true;
            }
        }
        current = err.source();
    }

    false
}
