//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response:
//!     → headers.rs (hardening headers)
//!
//! Feedback submission, after validation:
//!     → rate_limit.rs (per-address fixed window)
//!     → storage
//! ```
//!
//! # Design Decisions
//! - Limiter state is owned by the server and injected, never global
//! - Fail closed: a client over its quota gets no write

pub mod headers;
pub mod rate_limit;

pub use rate_limit::{Quota, RateLimiter, RATE_LIMIT_MESSAGE};
