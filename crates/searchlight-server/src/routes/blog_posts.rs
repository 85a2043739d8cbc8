//! Blog posts proxy

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Handle GET /api/blog-posts
///
/// Forwards the WordPress feed as sent, unknown fields included
pub async fn handle_blog_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let posts = state
        .blog
        .raw_posts()
        .await
        .map_err(|e| ApiError::fetch("blog posts", e))?;
    Ok(Json(posts))
}
