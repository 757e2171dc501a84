//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarding handler produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log event of a request
//! - Metrics are cheap (no-op until an exporter is installed)

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
