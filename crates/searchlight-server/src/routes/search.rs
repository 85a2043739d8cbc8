//! Unified search endpoint

use axum::Json;
use axum::extract::{Query, State};
use searchlight_core::SearchQuery;
use searchlight_upstream::SearchResults;
use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// Handle GET /api/search?q=
///
/// The term is recorded in the query log on a best-effort basis; a storage
/// failure is logged and the search still runs.
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let query = SearchQuery::parse(params.q.as_deref().unwrap_or_default())?;

    if let Err(e) = state.queries.record(query.clone()).await {
        warn!(error = %e, term = %query, "Failed to record search query");
    }

    Ok(Json(state.search.search(&query).await))
}
