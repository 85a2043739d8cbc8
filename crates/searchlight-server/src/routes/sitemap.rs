//! Sitemap and robots.txt endpoints
//!
//! Every handler here answers 200. When the query log or an upstream feed
//! fails, the document is rendered from whatever is still available.

use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use searchlight_sitemap::{
    UrlSet, blog_sitemap, combined_sitemap, robots_txt, search_sitemap, video_sitemap,
};
use tracing::warn;

use crate::state::AppState;

const XML: &str = "application/xml";

/// Edge caching for the search sitemap
const SEARCH_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=600";

fn xml_response(set: UrlSet) -> Response {
    ([(CONTENT_TYPE, XML)], set.to_xml()).into_response()
}

/// Terms for sitemaps, empty when the source fails
async fn terms_or_empty(state: &AppState) -> Vec<String> {
    match state.terms.search_terms().await {
        Ok(terms) => terms,
        Err(e) => {
            warn!(error = %e, "Search terms unavailable, rendering without them");
            Vec::new()
        }
    }
}

/// Handle GET /search-sitemap.xml
pub async fn handle_search_sitemap(State(state): State<AppState>) -> Response {
    let terms = terms_or_empty(&state).await;
    let set = search_sitemap(
        &state.config.base_url,
        &terms,
        state.config.search_sitemap_limit,
        Utc::now(),
    );
    (
        [(CONTENT_TYPE, XML), (CACHE_CONTROL, SEARCH_CACHE_CONTROL)],
        set.to_xml(),
    )
        .into_response()
}

/// Handle GET /blog-sitemap.xml
pub async fn handle_blog_sitemap(State(state): State<AppState>) -> Response {
    let posts = match state.blog.posts().await {
        Ok(posts) => posts,
        Err(e) => {
            warn!(error = %e, "Blog feed unavailable, listing the index only");
            Vec::new()
        }
    };
    xml_response(blog_sitemap(&state.config.base_url, &posts, Utc::now()))
}

/// Handle GET /sitemap.xml
pub async fn handle_sitemap(State(state): State<AppState>) -> Response {
    let terms = terms_or_empty(&state).await;
    xml_response(combined_sitemap(
        &state.config.base_url,
        &terms,
        state.config.search_sitemap_limit,
        Utc::now(),
    ))
}

/// Handle GET /video-sitemap.xml
pub async fn handle_video_sitemap(State(state): State<AppState>) -> Response {
    let videos = match state.videos.videos().await {
        Ok(videos) => videos,
        Err(e) => {
            warn!(error = %e, "Video index unavailable, rendering empty sitemap");
            Vec::new()
        }
    };
    xml_response(video_sitemap(
        &state.config.base_url,
        &state.config.video_api_url,
        &videos,
        Utc::now(),
    ))
}

/// Handle GET /robots.txt
pub async fn handle_robots(State(state): State<AppState>) -> Response {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.config.base_url),
    )
        .into_response()
}
