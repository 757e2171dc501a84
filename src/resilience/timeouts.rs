//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap the upstream call with a deadline
//! - Cancel the call cleanly on timeout (the future is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - The deadline covers the response head; the body streams afterwards

use std::future::Future;
use std::time::Duration;

use crate::error::ForwardError;

/// Await the upstream response head, failing with `UpstreamTimeout` after `limit`.
pub async fn with_upstream_timeout<F>(
    limit: Duration,
    call: F,
) -> Result<reqwest::Response, ForwardError>
where
    F: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) => Err(ForwardError::from_upstream(e, limit)),
        Err(_) => Err(ForwardError::UpstreamTimeout(limit)),
    }
}
