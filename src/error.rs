// src/error.rs
//! Stage-level error taxonomy. Config and binary edges use `anyhow` instead.

use thiserror::Error;

/// Free-text company filter did not resolve against the watchlist.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown company: {query}")]
    UnknownCompany {
        query: String,
        /// Closest watchlist display name, if any is reasonably similar.
        suggestion: Option<String>,
    },
}

/// Feed retrieval failed. Recoverable: the run continues with no records.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned HTTP {status}")]
    Status { status: u16 },
    #[error("feed parse failed: {0}")]
    Parse(String),
}

/// Notification call failed. Logged and counted, never retried.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}
