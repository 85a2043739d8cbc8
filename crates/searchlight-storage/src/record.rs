//! Log records and the payload contract

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use searchlight_core::{AnalyticsEvent, SearchQuery};

/// Anything that can be stored in an [`EventLog`](crate::EventLog)
pub trait LogPayload: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Identity used when the log drops repeats
    ///
    /// Two payloads with the same key are the same entry
    fn dedupe_key(&self) -> String;
}

impl LogPayload for SearchQuery {
    fn dedupe_key(&self) -> String {
        self.as_str().to_string()
    }
}

impl LogPayload for AnalyticsEvent {
    fn dedupe_key(&self) -> String {
        format!("{}:{}:{}", self.post_id, self.uuid, self.action)
    }
}

/// One stored unit of tracked activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord<T> {
    /// The stored payload
    pub payload: T,
    /// Assigned by the store at write time
    pub received_at: DateTime<Utc>,
}

impl<T> LogRecord<T> {
    /// Wrap a payload, stamping it with the current time
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            received_at: Utc::now(),
        }
    }
}
