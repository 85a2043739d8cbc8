//! Shapes returned by the upstream content sources
//!
//! Both sources are loosely typed JSON APIs, so every field that might be
//! missing defaults instead of failing the whole response.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A post from the WordPress custom posts endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    /// Publication date as sent by WordPress
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author: String,
    /// WordPress sends `false` when there is no image
    #[serde(default, deserialize_with = "string_or_none")]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Fields this type does not model, passed through as sent
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BlogPost {
    /// Parse the publication date, if it is in a recognizable format
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_loose_timestamp(&self.date)
    }
}

/// A video from the video index backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: String,
    /// YouTube video ID
    #[serde(rename = "videoId")]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Path of the thumbnail, relative to the video backend
    #[serde(default)]
    pub thumbnail: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

impl Video {
    /// Parse the creation timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_loose_timestamp(&self.created_at)
    }

    /// Public YouTube watch URL
    pub fn player_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Parse RFC 3339, or a zone-less `YYYY-MM-DD[ T]HH:MM:SS` taken as UTC
pub fn parse_loose_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}
