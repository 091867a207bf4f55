use crate::extract::{ImageCandidate, LinkCandidate, LinkType, Location};
use crate::resolver::{FinalUrl, ResolutionOutcome, StatusCode};
use serde::Serialize;

/// Data of the terminal `complete` event
pub const COMPLETE_DATA: &str = r#"{"status":"complete"}"#;

/// Name of the terminal event
pub const COMPLETE_EVENT: &str = "complete";

/// A resolved link as reported to the consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResult {
    pub link_type: LinkType,
    pub link_text: String,
    pub aria_label: String,
    pub original_url: String,
    pub final_url: FinalUrl,
    pub status_code: StatusCode,
    pub target: String,
    pub location: Location,
}

/// An image as reported to the consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub img_name: String,
    pub alt: String,
    pub location: Location,
}

/// One result in the output stream, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReportedResult {
    Link(LinkResult),
    Image(ImageResult),
}

impl ReportedResult {
    /// Combines a link candidate with its resolution outcome
    pub fn link(candidate: LinkCandidate, outcome: ResolutionOutcome) -> Self {
        Self::Link(LinkResult {
            link_type: candidate.link_type,
            link_text: candidate.link_text,
            aria_label: candidate.aria_label,
            original_url: candidate.href.to_string(),
            final_url: outcome.final_url,
            status_code: outcome.status_code,
            target: candidate.target,
            location: candidate.location,
        })
    }

    pub fn image(candidate: ImageCandidate) -> Self {
        Self::Image(ImageResult {
            img_name: candidate.img_name,
            alt: candidate.alt,
            location: candidate.location,
        })
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link(_))
    }
}

/// An item in the report stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Result(ReportedResult),
    /// Always last; sent exactly once
    Complete,
}

impl ReportEvent {
    /// Renders the event as a Server-Sent Events frame
    ///
    /// Results become `data: <json>\n\n`; completion becomes
    /// `event: complete\ndata: {"status":"complete"}\n\n`.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Result(result) => Ok(format!("data: {}\n\n", serde_json::to_string(result)?)),
            Self::Complete => Ok(format!(
                "event: {}\ndata: {}\n\n",
                COMPLETE_EVENT, COMPLETE_DATA
            )),
        }
    }
}
