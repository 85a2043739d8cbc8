//! HTTP route handlers

pub mod analytics;
pub mod blog_posts;
pub mod health;
pub mod queries;
pub mod search;
pub mod sitemap;

pub use analytics::{handle_analytics_summary, handle_record_analytics};
pub use blog_posts::handle_blog_posts;
pub use health::handle_health;
pub use queries::{handle_list_queries, handle_record_query};
pub use search::handle_search;
pub use sitemap::{
    handle_blog_sitemap, handle_robots, handle_search_sitemap, handle_sitemap,
    handle_video_sitemap,
};
