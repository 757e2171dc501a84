//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// The single upstream every matched request is forwarded to.
    pub upstream: UpstreamConfig,

    /// Path prefix mounting.
    pub routing: RoutingConfig,

    /// Cross-origin grants.
    pub cors: CorsConfig,

    /// Liveness endpoint settings.
    pub health: HealthConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Bind port. `0` asks the OS for an ephemeral port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// Upstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Fully-qualified base URL (e.g., "https://api.example.com").
    /// Required; an empty origin fails validation.
    pub origin: String,

    /// Deadline for the upstream response head in seconds.
    pub timeout_secs: u64,

    /// TCP connect deadline in seconds.
    pub connect_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// Path prefix configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Local mount point stripped before forwarding.
    pub path_prefix: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/api".to_string(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins permitted to call the proxy with credentials.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}

/// Liveness endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HealthConfig {
    /// Message reported next to `"status": "OK"`.
    pub message: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            message: "Forwarding proxy running".to_string(),
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.routing.path_prefix, "/api");
        assert_eq!(config.upstream.timeout(), Duration::from_secs(30));
        assert!(config.upstream.origin.is_empty());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            origin = "http://127.0.0.1:9000"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.origin, "http://127.0.0.1:9000");
        assert_eq!(config.upstream.connect_timeout_secs, 5);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.listener.port, 3001);
    }
}
