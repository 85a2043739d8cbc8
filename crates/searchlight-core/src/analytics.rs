//! Blog analytics events
//!
//! A client posts an [`AnalyticsSubmission`]; the server validates it into an
//! [`AnalyticsEvent`] and attaches the caller's [`Origin`] before storing it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blog_text::is_valid_slug;
use crate::error::ValidationError;

/// What the reader did with a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsAction {
    /// Post appeared in a listing or was opened
    View,
    /// Reader opened the full post
    DetailedView,
    /// Reader shared the post
    Share,
    /// Reader bookmarked the post
    Bookmark,
}

impl AnalyticsAction {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsAction::View => "view",
            AnalyticsAction::DetailedView => "detailed_view",
            AnalyticsAction::Share => "share",
            AnalyticsAction::Bookmark => "bookmark",
        }
    }
}

impl FromStr for AnalyticsAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(AnalyticsAction::View),
            "detailed_view" => Ok(AnalyticsAction::DetailedView),
            "share" => Ok(AnalyticsAction::Share),
            "bookmark" => Ok(AnalyticsAction::Bookmark),
            other => Err(ValidationError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for AnalyticsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller network metadata, attached server-side
///
/// Informational only. Headers are client-controlled and never used as
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    /// `User-Agent` header, empty when absent
    pub user_agent: String,
    /// First of `X-Forwarded-For` / `X-Real-IP`, `"unknown"` when absent
    pub ip: String,
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            ip: "unknown".to_string(),
        }
    }
}

impl Origin {
    /// Build an origin from raw header values
    pub fn from_headers(
        user_agent: Option<&str>,
        forwarded_for: Option<&str>,
        real_ip: Option<&str>,
    ) -> Self {
        let ip = forwarded_for
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| real_ip.map(str::trim).filter(|v| !v.is_empty()))
            .unwrap_or("unknown");

        Self {
            user_agent: user_agent.unwrap_or_default().to_string(),
            ip: ip.to_string(),
        }
    }
}

/// Raw analytics body as posted by the browser
///
/// Every field is optional here so that missing fields produce a
/// [`ValidationError`] instead of an opaque deserializer failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSubmission {
    pub post_id: Option<u64>,
    pub slug: Option<String>,
    pub uuid: Option<String>,
    pub action: Option<String>,
    pub timestamp: Option<String>,
}

impl AnalyticsSubmission {
    /// Parse a JSON body
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Validate into an event carrying the given origin
    pub fn validate(self, origin: Origin) -> Result<AnalyticsEvent, ValidationError> {
        let post_id = self.post_id.ok_or(ValidationError::MissingField("postId"))?;
        let slug = required(self.slug, "slug")?;
        if !is_valid_slug(&slug) {
            return Err(ValidationError::InvalidSlug(slug));
        }
        let uuid = required(self.uuid, "uuid")?;
        let action = required(self.action, "action")?.parse()?;

        let client_timestamp = match self.timestamp {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|_| ValidationError::InvalidTimestamp(raw.clone()))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        Ok(AnalyticsEvent {
            post_id,
            slug,
            uuid,
            action,
            client_timestamp,
            origin,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

/// A validated analytics event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    /// WordPress post ID
    pub post_id: u64,
    /// Post slug
    pub slug: String,
    /// Per-post UUID assigned by the frontend
    pub uuid: String,
    /// What happened
    pub action: AnalyticsAction,
    /// Timestamp claimed by the client, kept for reference only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<DateTime<Utc>>,
    /// Caller metadata
    #[serde(default)]
    pub origin: Origin,
}

impl AnalyticsEvent {
    /// Build an event directly (bypassing wire validation)
    pub fn new(
        post_id: u64,
        slug: impl Into<String>,
        uuid: impl Into<String>,
        action: AnalyticsAction,
    ) -> Self {
        Self {
            post_id,
            slug: slug.into(),
            uuid: uuid.into(),
            action,
            client_timestamp: None,
            origin: Origin::default(),
        }
    }
}
