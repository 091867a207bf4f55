//! Result reporting module
//!
//! This module defines what the consumer receives and how it is produced:
//! - The `ReportedResult` wire model (one per link or image)
//! - The `ReportEvent` stream item and its Server-Sent Events framing
//! - The `Reporter`, which fans link resolution out to the worker pool

mod event;
mod reporter;

pub use event::{
    ImageResult, LinkResult, ReportEvent, ReportedResult, COMPLETE_DATA, COMPLETE_EVENT,
};
pub use reporter::{ReportSummary, Reporter};
