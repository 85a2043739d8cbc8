//! Client tests against a local axum server standing in for the feeds

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use searchlight_upstream::{
    BlogSource, UpstreamError, VideoIndexClient, VideoSource, WordPressClient,
};
use serde_json::{Value, json};

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn wordpress_posts(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let all = json!([
        {"ID": 1, "title": "Rust tips", "slug": "rust-tips", "date": "2024-01-02 03:04:05",
         "featured_image": false},
        {"ID": 2, "title": "Cooking", "slug": "cooking", "date": "2024-02-02 03:04:05"}
    ]);
    match params.get("search") {
        Some(term) if term == "rust tips" => Json(json!([all[0].clone()])),
        Some(_) => Json(json!([])),
        None => Json(all),
    }
}

async fn video_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    Json(json!([
        {"_id": "v1", "videoId": "abc", "title": q, "createdAt": "2024-01-01T00:00:00Z"}
    ]))
}

#[tokio::test]
async fn test_wordpress_lists_and_searches() {
    let addr = spawn(Router::new().route("/posts/", get(wordpress_posts))).await;
    let client =
        WordPressClient::new(format!("http://{addr}/posts/"), Duration::from_secs(5)).unwrap();

    let posts = client.posts().await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].slug, "rust-tips");
    assert_eq!(posts[0].featured_image, None);

    let hits = client.search("rust tips").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 1);
}

#[tokio::test]
async fn test_wordpress_raw_posts_untouched() {
    let router = Router::new().route(
        "/posts/",
        get(|| async {
            Json(json!([
                {"ID": 1, "slug": "a", "thumbnail": "https://cdn/a.jpg"},
                {"ID": 2, "categories": [{"name": "News"}]}
            ]))
        }),
    );
    let addr = spawn(router).await;
    let client =
        WordPressClient::new(format!("http://{addr}/posts/"), Duration::from_secs(5)).unwrap();

    let raw = client.raw_posts().await.unwrap();
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[0]["thumbnail"], "https://cdn/a.jpg");
    assert_eq!(raw[1]["categories"][0]["name"], "News");

    let posts = client.posts().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "a");
}

#[tokio::test]
async fn test_video_index_search_encodes_query() {
    let addr = spawn(Router::new().route("/api/search", get(video_search))).await;
    let client = VideoIndexClient::new(format!("http://{addr}/"), Duration::from_secs(5)).unwrap();

    let videos = client.search("cats & dogs").await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].title, "cats & dogs");
    assert_eq!(videos[0].player_url(), "https://www.youtube.com/watch?v=abc");
}

#[tokio::test]
async fn test_non_success_status() {
    let router = Router::new().route(
        "/api/videos",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let addr = spawn(router).await;
    let client = VideoIndexClient::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap();

    let err = client.videos().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_malformed_body() {
    let router = Router::new().route("/api/videos", get(|| async { "not json" }));
    let addr = spawn(router).await;
    let client = VideoIndexClient::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap();

    assert!(matches!(
        client.videos().await,
        Err(UpstreamError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_timeout() {
    let router = Router::new().route(
        "/posts/",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!([]))
        }),
    );
    let addr = spawn(router).await;
    let client =
        WordPressClient::new(format!("http://{addr}/posts/"), Duration::from_millis(100)).unwrap();

    let err = client.posts().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Timeout { .. }));
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = WordPressClient::new(format!("http://{addr}/posts/"), Duration::from_secs(2)).unwrap();
    assert!(matches!(
        client.posts().await,
        Err(UpstreamError::Request { .. })
    ));
}
