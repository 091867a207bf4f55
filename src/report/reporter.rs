//! Streaming reporter
//!
//! Turns an extraction into a stream of [`ReportEvent`]s:
//!
//! 1. Every image is sent immediately (images need no resolution)
//! 2. Every link is submitted to the worker pool; each task sends its own
//!    result the moment its resolution finishes
//! 3. Once every link task has finished, a single `Complete` is sent and the
//!    sender is dropped, closing the stream
//!
//! The channel has exactly one consumer, which owns the output transport.
//! Link tasks never write to the transport themselves. If the consumer goes
//! away, sends fail silently and the remaining resolutions still run to
//! completion.

use crate::extract::{Extracted, LinkCandidate};
use crate::pool::WorkerPool;
use crate::report::event::{ReportEvent, ReportedResult};
use crate::resolver::{RedirectResolver, ResolutionOutcome};
use tokio::sync::mpsc;

/// Counts of what was reported for one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub links: usize,
    pub images: usize,
    /// Links whose outcome was not a 2xx/3xx response
    pub broken: usize,
}

/// Resolves extracted links on a worker pool and streams the results
#[derive(Debug, Clone)]
pub struct Reporter {
    pool: WorkerPool,
    resolver: RedirectResolver,
}

impl Reporter {
    pub fn new(pool: WorkerPool, resolver: RedirectResolver) -> Self {
        Self { pool, resolver }
    }

    /// Streams one event per candidate, then `Complete`
    ///
    /// Every candidate yields exactly one event. A link task that panics is
    /// reported with the degraded `"Error"` outcome; it never stops its
    /// siblings or the stream.
    pub async fn run(
        self,
        extracted: Extracted,
        events: mpsc::Sender<ReportEvent>,
    ) -> ReportSummary {
        let mut summary = ReportSummary {
            links: extracted.links.len(),
            images: extracted.images.len(),
            broken: 0,
        };

        for image in extracted.images {
            emit(&events, ReportEvent::Result(ReportedResult::image(image))).await;
        }

        let tasks: Vec<_> = extracted
            .links
            .into_iter()
            .map(|link| {
                let handle = self.pool.submit(resolve_link(
                    self.resolver.clone(),
                    link.clone(),
                    events.clone(),
                ));
                (link, handle)
            })
            .collect();

        tracing::debug!(
            "Submitted {} link(s) to a pool of {}",
            tasks.len(),
            self.pool.concurrency()
        );

        let finished = futures::future::join_all(tasks.into_iter().map(|(link, handle)| {
            let events = events.clone();
            async move {
                match handle.await {
                    Ok(ok) => ok,
                    Err(e) => {
                        tracing::error!("Link task for {} failed: {}", link.href, e);
                        let degraded = ReportedResult::link(link, ResolutionOutcome::error());
                        emit(&events, ReportEvent::Result(degraded)).await;
                        false
                    }
                }
            }
        }))
        .await;

        summary.broken = finished.iter().filter(|ok| !**ok).count();

        emit(&events, ReportEvent::Complete).await;
        summary
    }
}

/// The unit of work submitted to the pool; returns whether the link is healthy
async fn resolve_link(
    resolver: RedirectResolver,
    link: LinkCandidate,
    events: mpsc::Sender<ReportEvent>,
) -> bool {
    let outcome = resolver.resolve(link.href.as_str()).await;
    let ok = outcome.is_ok();

    if !ok {
        tracing::debug!(
            "{} -> {} ({})",
            link.href,
            outcome.final_url,
            outcome.status_code
        );
    }

    emit(&events, ReportEvent::Result(ReportedResult::link(link, outcome))).await;
    ok
}

async fn emit(events: &mpsc::Sender<ReportEvent>, event: ReportEvent) {
    if events.send(event).await.is_err() {
        tracing::debug!("Report consumer disconnected; dropping event");
    }
}
