//! Request spans.
//!
//! Each request gets one span carrying method, URI and the request ID, so
//! every event logged while handling it can be correlated.

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::http::request::request_id;

pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}
