//! Normalized search queries

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Generic category terms advertised before any real queries exist
pub const FALLBACK_CATALOG: &[&str] = &[
    "music",
    "gaming",
    "tutorial",
    "comedy",
    "news",
    "sports",
    "technology",
    "cooking",
    "travel",
    "education",
    "entertainment",
    "movies",
    "animation",
    "documentary",
    "live stream",
];

/// A search term, trimmed and lowercased
///
/// Two queries that differ only in case or surrounding whitespace are the
/// same `SearchQuery`. Deserialization goes through [`SearchQuery::parse`],
/// so a persisted query can never bypass normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalize a raw query, rejecting empty or whitespace-only input
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Get the normalized term
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the normalized term
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SearchQuery {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SearchQuery> for String {
    fn from(query: SearchQuery) -> Self {
        query.0
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
