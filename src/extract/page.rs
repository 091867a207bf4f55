//! Page fetching for extraction
//!
//! The page under analysis is fetched once, sequentially, before any link is
//! resolved. Any failure here fails the whole request.

use crate::config::Config;
use crate::extract::extractor::extract;
use crate::extract::node::Document;
use crate::extract::types::{ExtractOptions, Extracted};
use crate::CheckerError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Fetches the HTML of the page being checked
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds a page fetcher from the resolver and user agent settings
    pub fn new(config: &Config) -> Result<Self, CheckerError> {
        let client = Client::builder()
            .user_agent(config.user_agent.header_value())
            .timeout(Duration::from_secs(config.resolver.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(config.resolver.max_redirects as usize))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a page body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The body of a 2xx response
    /// * `Err(CheckerError::PageStatus)` - The page answered with a non-2xx status
    /// * `Err(CheckerError::PageFetch)` - The page could not be reached or read
    pub async fn fetch(&self, url: &Url) -> Result<String, CheckerError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CheckerError::PageFetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckerError::PageStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| CheckerError::PageFetch {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Fetches a page, parses it and extracts its candidates
///
/// This is the single fetch-and-parse step that precedes resolution.
pub async fn load_page(
    fetcher: &PageFetcher,
    url: &Url,
    options: ExtractOptions,
) -> Result<Extracted, CheckerError> {
    tracing::debug!("Fetching page {}", url);
    let html = fetcher.fetch(url).await?;

    let document = Document::parse(&html);
    Ok(extract(&document, url, options))
}
