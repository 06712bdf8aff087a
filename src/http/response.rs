//! Error responses and response headers.
//!
//! Every failure a handler can produce maps to a fixed status and JSON body.
//! Internal detail never reaches the client; storage errors are logged where
//! they happen and answered with an opaque message.

use std::any::Any;

use axum::{
    http::{header::RETRY_AFTER, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::security::rate_limit::{Quota, RATE_LIMIT_MESSAGE};
use crate::storage::StorageError;
use crate::validation::FieldError;

pub const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("rate limit exceeded")]
    RateLimited(Quota),

    #[error("malformed payload")]
    MalformedPayload,

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("feedback not found")]
    NotFound,

    #[error("failed to store feedback: {0}")]
    Write(#[source] StorageError),

    #[error("failed to read feedback: {0}")]
    Read(#[source] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::RateLimited(quota) => {
                let mut response = error_body(StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE);
                let headers = response.headers_mut();
                set_quota_headers(headers, &quota);
                headers.insert(RETRY_AFTER, HeaderValue::from(reset_secs(&quota)));
                response
            }
            ApiError::MalformedPayload => error_body(StatusCode::BAD_REQUEST, "Malformed payload"),
            ApiError::PayloadTooLarge => error_body(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large"),
            ApiError::NotFound => error_body(StatusCode::NOT_FOUND, "Feedback not found"),
            ApiError::Write(_) => {
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process feedback")
            }
            ApiError::Read(_) => {
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve feedback")
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Attach `RateLimit-Limit`, `RateLimit-Remaining` and `RateLimit-Reset`.
pub fn set_quota_headers(headers: &mut HeaderMap, quota: &Quota) {
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(quota.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(quota.remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(reset_secs(quota)));
}

// whole seconds, rounded up
fn reset_secs(quota: &Quota) -> u64 {
    quota.reset_after.as_millis().div_ceil(1000) as u64
}

/// Response for a handler that panicked.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Response for paths no route or static file matched.
pub async fn not_found() -> Response {
    error_body(StatusCode::NOT_FOUND, "Not Found")
}
