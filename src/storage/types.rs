//! Feedback record types.

use serde::{Deserialize, Serialize};

/// A validated submission, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub email: String,
    pub rating: i64,
    pub message: String,
    pub agent: String,
}

/// A stored feedback row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub email: String,
    pub rating: i64,
    pub message: String,
    pub agent: String,
    /// `YYYY-MM-DD HH:MM:SS` in UTC, set by SQLite on insert.
    pub created_at: String,
}

/// Public projection of a row: the id and timestamp are never exposed on reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackView {
    pub email: String,
    pub rating: i64,
    pub message: String,
    pub agent: String,
}

/// Body returned after a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFeedback {
    pub id: i64,
    pub email: String,
    pub rating: i64,
    pub message: String,
    pub agent: String,
}

impl From<Feedback> for FeedbackView {
    fn from(row: Feedback) -> Self {
        Self {
            email: row.email,
            rating: row.rating,
            message: row.message,
            agent: row.agent,
        }
    }
}

impl From<Feedback> for CreatedFeedback {
    fn from(row: Feedback) -> Self {
        Self {
            id: row.id,
            email: row.email,
            rating: row.rating,
            message: row.message,
            agent: row.agent,
        }
    }
}
