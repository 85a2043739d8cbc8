//! Blog analytics endpoints

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use searchlight_core::{AnalyticsSubmission, Origin};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::AckError;
use crate::state::AppState;

const RECORD_FAILED: &str = "Failed to record analytics";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Handle POST /api/blog-analytics
///
/// The origin is taken from the request headers, never from the body
pub async fn handle_record_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AckError> {
    let origin = Origin::from_headers(
        header(&headers, "user-agent"),
        header(&headers, "x-forwarded-for"),
        header(&headers, "x-real-ip"),
    );

    let event = AnalyticsSubmission::from_json(&body)
        .and_then(|submission| submission.validate(origin))
        .map_err(|e| AckError::new(e, RECORD_FAILED))?;

    let ack = state
        .analytics
        .record(event)
        .await
        .map_err(|e| AckError::new(e, RECORD_FAILED))?;
    debug!(?ack, "Analytics event stored");

    Ok(Json(json!({
        "success": true,
        "message": "Analytics data recorded",
    })))
}

/// Handle GET /api/blog-analytics
pub async fn handle_analytics_summary(State(state): State<AppState>) -> Json<Value> {
    let summary = state.analytics.summary().await;
    Json(json!({ "analytics": summary }))
}
