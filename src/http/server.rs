//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the liveness route and the forwarding fallback
//! - Wire up middleware (CORS, tracing, request ID)
//! - Forward prefixed requests to the upstream exactly once
//! - Serve on a listener until the shutdown signal fires

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{prepare, ConfigError, ProxyConfig};
use crate::error::ForwardError;
use crate::http::hooks::{ForwardContext, ForwardHooks, TracingHooks};
use crate::http::request::{
    body_read_error, request_id, upstream_target, MakeProxyRequestId, X_REQUEST_ID,
};
use crate::http::response::{self, relay};
use crate::observability::metrics;
use crate::resilience::with_upstream_timeout;
use crate::routing::PathPrefixMatcher;
use crate::security::{cors::cors_layer, headers::prepare_upstream_headers};

/// Error type for building a proxy instance.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub matcher: Arc<PathPrefixMatcher>,
    pub client: reqwest::Client,
    pub hooks: Arc<dyn ForwardHooks>,
}

/// A configured forwarding proxy instance.
///
/// Instances share nothing, so several can run side by side in one process.
pub struct ProxyServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl ProxyServer {
    /// Create a proxy that logs forwarding events through `tracing`.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        Self::with_hooks(config, TracingHooks)
    }

    /// Create a proxy with custom forwarding hooks.
    pub fn with_hooks(config: ProxyConfig, hooks: impl ForwardHooks) -> Result<Self, ServerError> {
        let config = Arc::new(prepare(config)?);

        let client = reqwest::Client::builder()
            .connect_timeout(config.upstream.connect_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;

        let state = AppState {
            matcher: Arc::new(PathPrefixMatcher::new(config.routing.path_prefix.clone())),
            config: config.clone(),
            client,
            hooks: Arc::new(hooks),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/health", get(health_handler))
            .fallback(proxy_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeProxyRequestId));

        match cors_layer(&config.cors) {
            Some(cors) => router.layer(cors),
            None => router,
        }
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Bind the configured listener address.
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        TcpListener::bind(self.config.listener.bind_address()).await
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.origin,
            path_prefix = %self.config.routing.path_prefix,
            "Forwarding proxy listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    response::health(&state.config.health.message)
}

/// Forwards requests under the prefix; everything else is a 404.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();

    let Some(stripped) = state.matcher.strip(request.uri().path()) else {
        tracing::debug!(path = %request.uri().path(), "No route matched");
        return response::not_found();
    };

    let ctx = ForwardContext {
        request_id: request_id(&request),
        method: request.method().clone(),
        path: request
            .uri()
            .path_and_query()
            .map_or_else(|| request.uri().path().to_string(), |pq| pq.to_string()),
        target: upstream_target(&state.config.upstream.origin, stripped, request.uri().query()),
    };

    let (parts, body) = request.into_parts();
    let max_body = state.config.limits.max_body_size;
    let body = match axum::body::to_bytes(body, max_body).await {
        Ok(bytes) => bytes,
        Err(e) => return fail(&state, &ctx, body_read_error(&e, max_body), start_time),
    };

    state.hooks.on_forward(&ctx);

    let call = state
        .client
        .request(parts.method, ctx.target.as_str())
        .headers(prepare_upstream_headers(parts.headers))
        .body(body)
        .send();

    let in_flight = InFlight::new(state.hooks.as_ref(), &ctx);
    let result = with_upstream_timeout(state.config.upstream.timeout(), call).await;
    in_flight.disarm();

    match result {
        Ok(upstream) => {
            let status = upstream.status();
            state.hooks.on_response(&ctx, status);
            metrics::record_request(ctx.method.as_str(), status.as_u16(), start_time);
            relay(upstream)
        }
        Err(e) => fail(&state, &ctx, e, start_time),
    }
}

fn fail(state: &AppState, ctx: &ForwardContext, error: ForwardError, start_time: Instant) -> Response {
    state.hooks.on_error(ctx, &error);
    metrics::record_upstream_error(error.kind());
    let response = error.into_response();
    metrics::record_request(ctx.method.as_str(), response.status().as_u16(), start_time);
    response
}

/// Reports `ClientDisconnect` if dropped while the upstream call is pending.
///
/// Axum drops the handler future when the caller goes away, which also drops
/// the in-flight upstream request.
struct InFlight<'a> {
    hooks: &'a dyn ForwardHooks,
    ctx: &'a ForwardContext,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(hooks: &'a dyn ForwardHooks, ctx: &'a ForwardContext) -> Self {
        Self { hooks, ctx, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.hooks.on_error(self.ctx, &ForwardError::ClientDisconnect);
        }
    }
}
