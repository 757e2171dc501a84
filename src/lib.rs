//! Path-prefixed forwarding proxy library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::ForwardError;
pub use http::{ForwardHooks, ProxyServer};
pub use lifecycle::Shutdown;
