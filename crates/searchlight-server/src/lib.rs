//! # Searchlight Server
//!
//! HTTP front for the Searchlight logs and sitemaps
//!
//! ## Routes
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | POST/GET | `/api/blog-analytics` | record an analytics event / summary |
//! | POST/GET | `/api/search-queries` | record a search term / list terms |
//! | GET | `/api/search?q=` | unified blog and video search |
//! | GET | `/api/blog-posts` | blog post proxy |
//! | GET | `/sitemap.xml`, `/search-sitemap.xml`, `/blog-sitemap.xml`, `/video-sitemap.xml` | sitemaps |
//! | GET | `/robots.txt` | crawler rules |
//! | GET | `/health` | liveness |
//!
//! The stores are built once at startup and reach handlers through
//! [`AppState`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{CliArgs, ConfigError, ServerConfig, StorageMode};
pub use error::{AckError, ApiError};
pub use state::AppState;

use axum::Router;
use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use routes::{
    handle_analytics_summary, handle_blog_posts, handle_blog_sitemap, handle_health,
    handle_list_queries, handle_record_analytics, handle_record_query, handle_robots,
    handle_search, handle_search_sitemap, handle_sitemap, handle_video_sitemap,
};

/// Build the application router over `state`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .route(
            "/api/blog-analytics",
            get(handle_analytics_summary).post(handle_record_analytics),
        )
        .route(
            "/api/search-queries",
            get(handle_list_queries).post(handle_record_query),
        )
        .route("/api/search", get(handle_search))
        .route("/api/blog-posts", get(handle_blog_posts))
        .route("/sitemap.xml", get(handle_sitemap))
        .route("/search-sitemap.xml", get(handle_search_sitemap))
        .route("/blog-sitemap.xml", get(handle_blog_sitemap))
        .route("/video-sitemap.xml", get(handle_video_sitemap))
        .route("/robots.txt", get(handle_robots))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `state` on `listener` until Ctrl+C or SIGTERM
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    info!(%address, "Server running");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process is asked to stop
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Cannot listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
