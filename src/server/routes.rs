//! Request handlers
//!
//! Everything that can fail (parameter validation, fetching and parsing the
//! page) is decided before the stream is opened, so failures still get a
//! proper status code. Once the stream starts it always ends with `complete`.

use crate::extract::{load_page, ExtractOptions};
use crate::report::{ReportEvent, Reporter, COMPLETE_DATA, COMPLETE_EVENT};
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::CheckerError;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use url::Url;

/// Events buffered between the link tasks and the stream writer
const EVENT_BUFFER: usize = 64;

/// Query of `/api/check-site-content`
///
/// Flags are enabled only by the literal string `true`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckQuery {
    pub site_url: Option<String>,
    pub check_links: Option<String>,
    pub check_images: Option<String>,
    pub exclude_header_footer: Option<String>,
}

impl CheckQuery {
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions {
            check_links: flag(&self.check_links),
            check_images: flag(&self.check_images),
            exclude_header_footer: flag(&self.exclude_header_footer),
        }
    }
}

/// Query of `/check-site-urls-stream`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinksQuery {
    pub site_url: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

/// Validates the `siteUrl` parameter
///
/// # Returns
///
/// * `Ok(Url)` - An absolute http or https URL
/// * `Err(ApiError::MissingSiteUrl)` - The parameter is absent or blank
/// * `Err(ApiError::InvalidSiteUrl)` - The parameter does not parse, or uses another scheme
pub fn parse_site_url(raw: Option<&str>) -> Result<Url, ApiError> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ApiError::MissingSiteUrl),
    };

    let url = Url::parse(raw).map_err(CheckerError::from)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(CheckerError::InvalidSiteUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme '{}'", scheme),
        }
        .into()),
    }
}

/// `GET /api/check-site-content`
pub async fn check_site_content(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let site_url = parse_site_url(query.site_url.as_deref())?;
    stream_report(state, site_url, query.options()).await
}

/// `GET /check-site-urls-stream`
///
/// Links only, header and footer included.
pub async fn check_site_urls_stream(
    State(state): State<AppState>,
    Query(query): Query<LinksQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let site_url = parse_site_url(query.site_url.as_deref())?;
    stream_report(state, site_url, ExtractOptions::links_only()).await
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn stream_report(
    state: AppState,
    site_url: Url,
    options: ExtractOptions,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    tracing::info!("Checking {} ({:?})", site_url, options);

    let extracted = load_page(state.page_fetcher(), &site_url, options)
        .await
        .map_err(|e| {
            tracing::error!("Extraction failed for {}: {}", site_url, e);
            ApiError::from(e)
        })?;

    tracing::info!(
        "Found {} link(s) and {} image(s) on {}",
        extracted.links.len(),
        extracted.images.len(),
        site_url
    );

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let reporter = Reporter::new(state.pool().clone(), state.resolver_for_request());

    tokio::spawn(async move {
        let summary = reporter.run(extracted, tx).await;
        tracing::info!(
            "Finished {}: {} link(s), {} broken, {} image(s)",
            site_url,
            summary.links,
            summary.broken,
            summary.images
        );
    });

    let events = ReceiverStream::new(rx)
        .filter_map(|event| async move { to_sse_event(event).map(Ok::<_, Infallible>) });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: ReportEvent) -> Option<Event> {
    match event {
        ReportEvent::Result(result) => match Event::default().json_data(&result) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::error!("Failed to serialize result: {}", e);
                None
            }
        },
        ReportEvent::Complete => {
            Some(Event::default().event(COMPLETE_EVENT).data(COMPLETE_DATA))
        }
    }
}
