//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce connect/response deadline)
//!     → On failure: opaque 500 to the caller
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - Exactly one attempt per request: no retries, no circuit breaking

pub mod timeouts;

pub use timeouts::with_upstream_timeout;
