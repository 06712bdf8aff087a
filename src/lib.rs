//! Feedback collection service.
//!
//! A small REST backend behind a static HTML form: submissions are
//! validated, rate-limited per client address, and stored in SQLite.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod storage;
pub mod validation;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use storage::FeedbackStore;
