//! Error types for API client operations.

use thiserror::Error;

/// Errors that can occur when talking to the crawl API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Request exceeded its deadline.
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Network connectivity error (DNS, connection refused, reset).
    #[error("connection failed: {0}")]
    Connection(String),

    /// Server-side failure (5xx).
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Request rejected by the server (4xx); `message` is meant for users.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Response body could not be decoded or violates payload invariants.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Identifier cannot be addressed as a single path segment.
    #[error("invalid id '{0}'")]
    InvalidId(String),

    /// Client could not be constructed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Connection(_) | Self::Server { .. } | Self::InvalidResponse(_)
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            Self::Timeout(timeout_seconds)
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Connection(e.to_string())
        }
    }
}
