//! Feedback endpoints.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::request::FeedbackPayload;
use crate::http::response::{set_quota_headers, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::storage::{CreatedFeedback, FeedbackView};
use crate::validation::validate_submission;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /feedback`: validate, rate-limit, then insert.
pub async fn create_feedback(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    FeedbackPayload(submission): FeedbackPayload,
) -> Result<Response, ApiError> {
    let record = validate_submission(&submission).map_err(|errors| {
        tracing::debug!(client = %addr.ip(), fields = errors.len(), "Feedback failed validation");
        metrics::record_rejected("validation");
        ApiError::Validation(errors)
    })?;

    let quota = match &state.limiter {
        Some(limiter) => {
            let quota = limiter.check(addr.ip());
            if !quota.allowed {
                tracing::warn!(client = %addr.ip(), limit = quota.limit, "Rate limit exceeded");
                metrics::record_rejected("rate_limit");
                return Err(ApiError::RateLimited(quota));
            }
            Some(quota)
        }
        None => None,
    };

    let stored = state.store.insert(record).await.map_err(|e| {
        tracing::error!(error = %e, "Error inserting feedback");
        metrics::record_rejected("storage");
        ApiError::Write(e)
    })?;

    tracing::info!(id = stored.id, rating = stored.rating, "Feedback stored");
    metrics::record_feedback_created(stored.rating);

    let mut response = (StatusCode::CREATED, Json(CreatedFeedback::from(stored))).into_response();
    if let Some(quota) = quota {
        set_quota_headers(response.headers_mut(), &quota);
    }
    Ok(response)
}

/// `GET /feedback`: every row, in insertion order.
pub async fn list_feedback(State(state): State<AppState>) -> Result<Json<Vec<FeedbackView>>, ApiError> {
    let rows = state.store.list().await.map_err(|e| {
        tracing::error!(error = %e, "Error retrieving feedback");
        ApiError::Read(e)
    })?;

    Ok(Json(rows.into_iter().map(FeedbackView::from).collect()))
}

/// `GET /feedback/{id}`. Ids that are not integers cannot exist, so they are 404 too.
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FeedbackView>, ApiError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::NotFound);
    };

    let row = state.store.get(id).await.map_err(|e| {
        tracing::error!(error = %e, id, "Error retrieving feedback");
        ApiError::Read(e)
    })?;

    row.map(|r| Json(FeedbackView::from(r))).ok_or(ApiError::NotFound)
}
