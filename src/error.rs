//! Forwarding errors.
//!
//! Every upstream-facing failure is caught at the forwarding boundary and
//! turned into an opaque response (see `http::response`). The variants only
//! exist for logging and hooks.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// Connection refused, DNS failure, reset, or any other transport error.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    /// No response head within the configured bound.
    #[error("upstream did not respond within {0:?}")]
    UpstreamTimeout(Duration),

    /// The caller went away before the upstream answered.
    #[error("client disconnected before the upstream responded")]
    ClientDisconnect,

    /// The rewritten target could not be turned into a request.
    #[error("invalid upstream target: {0}")]
    InvalidTarget(String),

    /// Inbound body exceeded the configured limit.
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),
}

impl ForwardError {
    /// Classify a client error from the upstream call.
    pub fn from_upstream(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ForwardError::UpstreamTimeout(timeout)
        } else if err.is_builder() {
            ForwardError::InvalidTarget(err.to_string())
        } else {
            ForwardError::UpstreamUnreachable(err)
        }
    }

    /// Whether this should be logged as a proxy failure.
    pub fn is_failure(&self) -> bool {
        !matches!(self, ForwardError::ClientDisconnect)
    }

    /// Short stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::UpstreamUnreachable(_) => "upstream_unreachable",
            ForwardError::UpstreamTimeout(_) => "upstream_timeout",
            ForwardError::ClientDisconnect => "client_disconnect",
            ForwardError::InvalidTarget(_) => "invalid_target",
            ForwardError::PayloadTooLarge(_) => "payload_too_large",
        }
    }
}
