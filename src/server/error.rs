use crate::CheckerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures decided before the event stream starts
#[derive(Debug, Error)]
pub enum ApiError {
    /// `siteUrl` absent or empty
    #[error("Site URL is required")]
    MissingSiteUrl,

    /// `siteUrl` is not an absolute http(s) URL
    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(String),

    /// The page could not be fetched or read
    #[error("An error occurred: {0}")]
    Extraction(CheckerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MissingSiteUrl => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Site URL is required" }),
            ),
            Self::InvalidSiteUrl(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid site URL", "details": details }),
            ),
            Self::Extraction(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "An error occurred", "details": e.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CheckerError> for ApiError {
    fn from(e: CheckerError) -> Self {
        match e {
            CheckerError::InvalidSiteUrl { message, .. } => Self::InvalidSiteUrl(message),
            CheckerError::UrlParse(e) => Self::InvalidSiteUrl(e.to_string()),
            other => Self::Extraction(other),
        }
    }
}
