use serde::{Serialize, Serializer};
use std::fmt;

/// Where a resolution ended up, or why it could not say
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FinalUrl {
    /// The URL reached after following redirects
    Resolved(String),
    /// The request failed without a usable response
    Error,
    /// The connection was reset by the remote end
    ConnectionReset,
    /// An error response arrived but carried no URL
    NoFinalUrl,
}

impl FinalUrl {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Resolved(url) => url,
            Self::Error => "Error",
            Self::ConnectionReset => "Connection reset",
            Self::NoFinalUrl => "No final URL found",
        }
    }
}

impl fmt::Display for FinalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FinalUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// HTTP status of the terminal response, if there was one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Code(u16),
    NotApplicable,
}

impl StatusCode {
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Code(code) => Some(*code),
            Self::NotApplicable => None,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::NotApplicable => f.write_str("N/A"),
        }
    }
}

/// Serializes as a JSON number, or the string `"N/A"`
impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Code(code) => serializer.serialize_u16(*code),
            Self::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

/// Terminal result of resolving one URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub final_url: FinalUrl,
    pub status_code: StatusCode,
}

impl ResolutionOutcome {
    /// A response was received with the given URL and status
    pub fn resolved(final_url: impl Into<String>, status: u16) -> Self {
        Self {
            final_url: FinalUrl::Resolved(final_url.into()),
            status_code: StatusCode::Code(status),
        }
    }

    /// Degraded outcome for a request that failed without a response
    pub fn error() -> Self {
        Self {
            final_url: FinalUrl::Error,
            status_code: StatusCode::NotApplicable,
        }
    }

    /// Degraded outcome for a connection reset by the peer
    pub fn connection_reset() -> Self {
        Self {
            final_url: FinalUrl::ConnectionReset,
            status_code: StatusCode::NotApplicable,
        }
    }

    /// Returns true for a 2xx/3xx terminal response
    pub fn is_ok(&self) -> bool {
        self.status_code
            .code()
            .is_some_and(|code| (200..400).contains(&code))
    }
}
