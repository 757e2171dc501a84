//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream response to the caller
//! - Map forwarding errors to opaque responses
//! - Liveness and not-found payloads
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Hop-by-hop headers and upstream CORS grants stripped automatically
//! - No upstream error detail ever reaches the caller

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::ForwardError;
use crate::security::headers::{strip_cors_grants, strip_hop_by_hop};

/// Body sent for every upstream-facing failure.
pub const PROXY_ERROR_BODY: &str = "Proxy error occurred";

/// Copy status, end-to-end headers and a streamed body from the upstream.
///
/// Upstream CORS grants are dropped; only the proxy's CORS layer grants.
pub fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);
    strip_cors_grants(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        match self {
            ForwardError::PayloadTooLarge(_) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large").into_response()
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, PROXY_ERROR_BODY).into_response(),
        }
    }
}

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: String,
}

pub fn health(message: &str) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK",
        message: message.to_string(),
    })
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
