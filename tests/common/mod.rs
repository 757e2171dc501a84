//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use forwarding_proxy::config::ProxyConfig;
use forwarding_proxy::error::ForwardError;
use forwarding_proxy::http::{ForwardContext, ForwardHooks};
use forwarding_proxy::{ProxyServer, Shutdown};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port.
pub async fn start_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// A stub upstream with a few fixed behaviours.
#[allow(dead_code)]
pub fn stub_router() -> Router {
    Router::new()
        .route(
            "/widgets",
            get(|| async {
                (
                    StatusCode::CREATED,
                    [("content-type", "application/json"), ("x-upstream", "stub")],
                    r#"{"echo": true}"#,
                )
            }),
        )
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
        .route(
            "/permissive",
            get(|| async {
                (
                    [
                        ("access-control-allow-origin", "*"),
                        ("access-control-allow-credentials", "true"),
                        ("access-control-expose-headers", "x-upstream-secret"),
                    ],
                    "open to everyone",
                )
            }),
        )
        .route(
            "/teapot",
            get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }),
        )
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    Json(serde_json::json!({
        "method": method.as_str(),
        "uri": uri.to_string(),
        "host": header("host"),
        "custom": header("x-custom"),
        "request_id": header("x-request-id"),
        "body": String::from_utf8_lossy(&body),
    }))
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Proxy config pointing at `upstream` and listening on an ephemeral port.
pub fn proxy_config(upstream: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.upstream.origin = upstream.to_string();
    config.upstream.timeout_secs = 2;
    config.cors.allowed_origins = vec!["http://localhost:8080".into()];
    config
}

/// Start a proxy instance; returns its address and the shutdown handle.
pub async fn start_proxy(config: ProxyConfig, hooks: impl ForwardHooks) -> (SocketAddr, Shutdown) {
    let server = ProxyServer::with_hooks(config, hooks).unwrap();
    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Hooks that record every call for later assertions.
#[derive(Debug, Default, Clone)]
#[allow(dead_code)]
pub struct RecordingHooks {
    events: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingHooks {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ForwardHooks for RecordingHooks {
    fn on_forward(&self, ctx: &ForwardContext) {
        self.push(format!("forward {} {} -> {}", ctx.method, ctx.path, ctx.target));
    }

    fn on_response(&self, ctx: &ForwardContext, status: StatusCode) {
        self.push(format!("response {} {}", ctx.path, status.as_u16()));
    }

    fn on_error(&self, ctx: &ForwardContext, error: &ForwardError) {
        self.push(format!("error {} {}", ctx.path, error.kind()));
    }
}
