//! Forwarding hooks.
//!
//! The forwarding routine reports three points of a request's life:
//! before the upstream call, after the upstream response head, and on
//! error. Hooks run inline on the request task, so they must not block.

use axum::http::{Method, StatusCode};

use crate::error::ForwardError;

/// Per-request details handed to hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardContext {
    pub request_id: String,
    pub method: Method,
    /// Inbound path and query, as received.
    pub path: String,
    /// Outbound URL on the upstream.
    pub target: String,
}

/// Capability points invoked by the forwarding handler.
pub trait ForwardHooks: Send + Sync + 'static {
    fn on_forward(&self, _ctx: &ForwardContext) {}

    fn on_response(&self, _ctx: &ForwardContext, _status: StatusCode) {}

    fn on_error(&self, _ctx: &ForwardContext, _error: &ForwardError) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl ForwardHooks for NoopHooks {}

/// Hooks that log each point through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHooks;

impl ForwardHooks for TracingHooks {
    fn on_forward(&self, ctx: &ForwardContext) {
        tracing::info!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            target = %ctx.target,
            "Proxying request to upstream"
        );
    }

    fn on_response(&self, ctx: &ForwardContext, status: StatusCode) {
        tracing::info!(
            request_id = %ctx.request_id,
            status = status.as_u16(),
            path = %ctx.path,
            "Received upstream response"
        );
    }

    fn on_error(&self, ctx: &ForwardContext, error: &ForwardError) {
        if error.is_failure() {
            tracing::error!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                path = %ctx.path,
                target = %ctx.target,
                error = %error,
                "Proxy error"
            );
        } else {
            tracing::debug!(
                request_id = %ctx.request_id,
                path = %ctx.path,
                "Client disconnected, abandoning upstream call"
            );
        }
    }
}
