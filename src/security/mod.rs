//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (grant or withhold CORS for the Origin)
//!     → headers.rs (strip hop-by-hop, drop Host)
//!     → Forward to upstream
//!
//! Upstream response:
//!     → headers.rs (strip hop-by-hop)
//!     → cors.rs (append grant headers)
//! ```
//!
//! # Design Decisions
//! - CORS is a browser hint, not authorization
//! - No trust in client-supplied hop-by-hop headers

pub mod cors;
pub mod headers;
