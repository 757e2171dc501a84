//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) when the caller sent none
//! - Derive the outbound target URL from the inbound path
//! - Classify failures while buffering the inbound body
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The outbound URL is a plain concatenation: origin + stripped path + query

use std::error::Error as StdError;

use axum::http::{HeaderName, HeaderValue, Request};
use http_body_util::LengthLimitError;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::ForwardError;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeProxyRequestId;

impl MakeRequestId for MakeProxyRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request-id layer.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Build the upstream URL for a stripped path.
///
/// `origin` is expected without a trailing slash and `stripped` is either
/// empty or starts with `/`.
pub fn upstream_target(origin: &str, stripped: &str, query: Option<&str>) -> String {
    let mut target = String::with_capacity(
        origin.len() + stripped.len() + query.map_or(0, |q| q.len() + 1),
    );
    target.push_str(origin);
    target.push_str(stripped);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Map a failed inbound body read to a forwarding error.
///
/// Only an exceeded length limit is the caller's payload being too large;
/// any other read failure means the caller stopped sending.
pub fn body_read_error(error: &axum::Error, limit: usize) -> ForwardError {
    let mut source: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return ForwardError::PayloadTooLarge(limit);
        }
        source = err.source();
    }
    ForwardError::ClientDisconnect
}
