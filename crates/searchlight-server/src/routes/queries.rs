//! Search query log endpoints

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use searchlight_core::{SearchQuery, ValidationError};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

/// Pull the `query` string out of a request body
///
/// Anything other than a JSON object with a string `query` counts as an
/// invalid query.
fn parse_body(body: &[u8]) -> Result<SearchQuery, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ValidationError::EmptyQuery)?;
    let raw = value
        .get("query")
        .and_then(Value::as_str)
        .ok_or(ValidationError::EmptyQuery)?;
    SearchQuery::parse(raw)
}

/// Handle POST /api/search-queries
pub async fn handle_record_query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let query = parse_body(&body)?;
    state.queries.record(query.clone()).await?;

    Ok(Json(json!({ "success": true, "query": query.as_str() })))
}

/// Handle GET /api/search-queries
pub async fn handle_list_queries(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "queries": state.queries.terms().await }))
}
