//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request path
//!     → matcher.rs (prefix match on a segment boundary)
//!     → Return: stripped remainder or NoMatch
//! ```
//!
//! # Design Decisions
//! - A single prefix compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same remainder

pub mod matcher;

pub use matcher::PathPrefixMatcher;
