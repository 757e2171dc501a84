//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Drop host-routing headers so the client targets the upstream authority
//!
//! # Design Decisions
//! - Headers named in `Connection` are hop-by-hop too (RFC 9110 §7.6.1)
//! - End-to-end headers are forwarded byte-for-byte

use axum::http::header::{self, HeaderMap, HeaderName};

/// Headers that apply to a single transport connection.
pub static HOP_BY_HOP_HEADERS: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Check if a header is a hop-by-hop header.
pub fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name)
}

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP_HEADERS.iter()) {
        headers.remove(name);
    }
}

/// CORS response headers decided by the proxy's own CORS layer.
pub static CORS_GRANT_HEADERS: [HeaderName; 5] = [
    header::ACCESS_CONTROL_ALLOW_ORIGIN,
    header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
    header::ACCESS_CONTROL_EXPOSE_HEADERS,
    header::ACCESS_CONTROL_ALLOW_METHODS,
    header::ACCESS_CONTROL_ALLOW_HEADERS,
];

/// Drop any CORS grant the upstream sent.
///
/// The CORS layer only writes these for listed origins, so an upstream grant
/// left in place would leak to unlisted ones.
pub fn strip_cors_grants(headers: &mut HeaderMap) {
    for name in CORS_GRANT_HEADERS.iter() {
        headers.remove(name);
    }
}

/// Prepare inbound request headers for the upstream.
///
/// `Host` is removed so the client sets it from the upstream URL, and
/// `Content-Length` is recomputed from the buffered body.
pub fn prepare_upstream_headers(mut headers: HeaderMap) -> HeaderMap {
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers
}
