//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! validated NewFeedback
//!     → sqlite.rs (single connection, blocking pool)
//!     → feedback table (CHECK constraint on rating)
//!     → Feedback row back to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Schema is created with `CREATE TABLE IF NOT EXISTS` on open; no migrations
//! - Rows are append-only: nothing here updates or deletes
//! - Reads project away `id` and `created_at` in the HTTP layer, not in SQL

pub mod error;
pub mod sqlite;
pub mod types;

pub use error::StorageError;
pub use sqlite::FeedbackStore;
pub use types::{CreatedFeedback, Feedback, FeedbackView, NewFeedback};
