use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure outcomes of the link pipeline.
///
/// The `Display` text is meant for direct display to users; the underlying
/// reqwest error (when there is one) stays reachable through `source()` for logs.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Access blocked: {url} returned HTTP 403 (the site is likely using bot protection)")]
    AccessBlocked { url: String },

    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout {
        url: String,
        timeout_secs: u64,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not connect to {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed sitemap at {url}: {reason}")]
    MalformedSitemap { url: String, reason: String },

    #[error("No links detected on {url}")]
    NoLinksFound { url: String },

    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to fetch {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Serializable classification of a [`LinkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AccessBlocked,
    Timeout,
    ConnectionError,
    MalformedSitemap,
    NoLinksFound,
    GenericFetchFailure,
    InvalidUrl,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AccessBlocked => "access_blocked",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ConnectionError => "connection_error",
            ErrorKind::MalformedSitemap => "malformed_sitemap",
            ErrorKind::NoLinksFound => "no_links_found",
            ErrorKind::GenericFetchFailure => "generic_fetch_failure",
            ErrorKind::InvalidUrl => "invalid_url",
        }
    }
}

/// The error shape embedded in JSON reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl LinkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinkError::AccessBlocked { .. } => ErrorKind::AccessBlocked,
            LinkError::Timeout { .. } => ErrorKind::Timeout,
            LinkError::Connection { .. } => ErrorKind::ConnectionError,
            LinkError::MalformedSitemap { .. } => ErrorKind::MalformedSitemap,
            LinkError::NoLinksFound { .. } => ErrorKind::NoLinksFound,
            LinkError::HttpStatus { .. } | LinkError::Transport { .. } => {
                ErrorKind::GenericFetchFailure
            }
            LinkError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
        }
    }

    pub fn is_access_blocked(&self) -> bool {
        matches!(self, LinkError::AccessBlocked { .. })
    }

    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<&LinkError> for ErrorReport {
    fn from(err: &LinkError) -> Self {
        err.to_report()
    }
}
