//! Async client for the feedback service.

pub mod client;

pub use client::{ClientError, FeedbackClient, FeedbackEntry, NewFeedback, SubmitOutcome, SubmittedFeedback};
