//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, request ID, tracing)
//!     → /health → response.rs (static liveness payload)
//!     → {prefix}/* → request.rs (build upstream target)
//!         → hooks.rs on_forward
//!         → upstream call (one attempt, bounded)
//!         → hooks.rs on_response / on_error
//!         → response.rs (relay or opaque error)
//!     → anything else → 404
//! ```

pub mod hooks;
pub mod request;
pub mod response;
pub mod server;

pub use hooks::{ForwardContext, ForwardHooks, NoopHooks, TracingHooks};
pub use request::X_REQUEST_ID;
pub use server::{ProxyServer, ServerError};
