//! Path-prefixed forwarding proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │               FORWARDING PROXY               │
//!                         │                                              │
//!   Client Request        │  ┌──────┐   ┌──────────┐   ┌─────────────┐   │
//!   ──────────────────────┼─▶│ CORS │──▶│ routing  │──▶│  upstream   │───┼──▶ Upstream
//!                         │  │layer │   │ /api/* → │   │ client      │   │    Origin
//!                         │  └──────┘   │ strip    │   │ (1 attempt, │   │
//!                         │             └────┬─────┘   │  bounded)   │   │
//!                         │                  │         └──────┬──────┘   │
//!                         │        /health   │  other → 404   │          │
//!   Client Response       │                  ▼                ▼          │
//!   ◀─────────────────────┼──────────── relay verbatim / opaque 500 ◀────┼─── Response
//!                         └──────────────────────────────────────────────┘
//! ```
//!
//! Configuration comes from the environment (`UPSTREAM_ORIGIN`, `LISTEN_PORT`,
//! `PATH_PREFIX`, `ALLOWED_ORIGINS`, ...) layered over an optional TOML file
//! named by `PROXY_CONFIG`.

use std::net::SocketAddr;

use forwarding_proxy::config::{self, ObservabilityConfig};
use forwarding_proxy::lifecycle::{signals, Shutdown};
use forwarding_proxy::observability::{self, metrics};
use forwarding_proxy::ProxyServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            observability::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            std::process::exit(1);
        }
    };

    observability::init_logging(&config.observability);

    tracing::info!("forwarding-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.origin,
        path_prefix = %config.routing.path_prefix,
        allowed_origins = ?config.cors.allowed_origins,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let server = ProxyServer::new(config)?;
    let listener = server.bind().await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
