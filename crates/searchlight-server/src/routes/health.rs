//! Liveness probe

/// Handle GET /health
pub async fn handle_health() -> &'static str {
    "OK"
}
