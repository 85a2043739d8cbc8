//! # Searchlight Core
//!
//! Domain types shared by the Searchlight crates
//!
//! ## Features
//!
//! - **AnalyticsEvent**: a validated blog analytics record with server-side [`Origin`]
//! - **SearchQuery**: a trimmed, lowercased search term
//! - **BlogPost / Video**: the shapes returned by the two upstream content sources
//! - **Blog text helpers**: slugs, excerpts and reading time estimates
//!
//! Payloads coming off the wire are validated here, before they ever reach
//! a store:
//!
//! ```rust
//! use searchlight_core::SearchQuery;
//!
//! let query = SearchQuery::parse("  Live Stream ").unwrap();
//! assert_eq!(query.as_str(), "live stream");
//! assert!(SearchQuery::parse("   ").is_err());
//! ```

pub mod analytics;
pub mod blog_text;
pub mod content;
pub mod error;
pub mod query;

pub use analytics::{AnalyticsAction, AnalyticsEvent, AnalyticsSubmission, Origin};
pub use content::{BlogPost, Video};
pub use error::ValidationError;
pub use query::{FALLBACK_CATALOG, SearchQuery};
