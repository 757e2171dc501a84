//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file named by PROXY_CONFIG (loader.rs)
//!     → environment overrides (loader.rs)
//!     → normalization (trailing slashes)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to ProxyServer::new
//! ```
//!
//! # Design Decisions
//! - Config is fixed at process start; there is no reload
//! - All fields except the upstream origin have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, prepare, ConfigError};
pub use schema::{
    CorsConfig, HealthConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ProxyConfig, RoutingConfig, UpstreamConfig,
};
pub use validation::ValidationError;
