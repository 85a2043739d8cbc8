//! Bounded, insertion-ordered event log
//!
//! An [`EventLog`] keeps its entries in memory and writes every change
//! through to a [`LogBackend`]. The whole append-trim-persist sequence runs
//! under one async mutex: concurrent appends may land in either order, but
//! the capacity invariant holds after every completed write.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::LogBackend;
use crate::error::StorageError;
use crate::record::{LogPayload, LogRecord};
use crate::retention::RetentionPolicy;

/// Outcome of a successful append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// Stored at the tail, after evicting `evicted` entries from the head
    Appended { evicted: usize },
    /// An equivalent entry already exists; nothing changed
    Duplicate,
}

impl Ack {
    /// Whether the append changed the log
    pub fn is_stored(&self) -> bool {
        matches!(self, Ack::Appended { .. })
    }
}

/// Trivial counts over a log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary<T> {
    /// Number of retained entries
    pub total_count: usize,
    /// Number of distinct values of the summary key
    pub unique_key_count: usize,
    /// Newest entries, oldest first
    pub most_recent: Vec<LogRecord<T>>,
}

/// Entries plus the key index used for deduplication
#[derive(Debug)]
struct LogState<T> {
    entries: VecDeque<LogRecord<T>>,
    keys: HashSet<String>,
}

impl<T: LogPayload> LogState<T> {
    fn from_records(records: Vec<LogRecord<T>>, policy: &RetentionPolicy) -> Self {
        let mut entries = VecDeque::with_capacity(records.len());
        let mut keys = HashSet::new();

        for record in records {
            let key = record.payload.dedupe_key();
            if policy.drops_repeats() && !keys.insert(key) {
                continue;
            }
            entries.push_back(record);
        }

        let evicted = policy.trim(&mut entries);
        if policy.drops_repeats() {
            for record in &evicted {
                keys.remove(&record.payload.dedupe_key());
            }
        }

        Self { entries, keys }
    }
}

/// A bounded append-only log over a swappable backend
pub struct EventLog<T: LogPayload> {
    /// Name used in logs and file names
    name: String,
    /// Capacity and deduplication rules
    policy: RetentionPolicy,
    /// Where snapshots go
    backend: Arc<dyn LogBackend<T>>,
    /// Current contents
    state: Mutex<LogState<T>>,
}

impl<T: LogPayload> EventLog<T> {
    /// Open a log, loading whatever the backend already holds
    ///
    /// A backend that cannot be read is logged and treated as empty; the
    /// log still accepts writes and will overwrite the unreadable snapshot.
    #[instrument(skip_all, fields(backend = backend.kind()))]
    pub async fn open(
        name: impl Into<String>,
        policy: RetentionPolicy,
        backend: Arc<dyn LogBackend<T>>,
    ) -> Self {
        let name = name.into();

        let records = match backend.load().await {
            Ok(records) => records,
            Err(e) => {
                warn!(log = %name, error = %e, "Backing store unreadable, starting empty");
                Vec::new()
            }
        };

        let loaded = records.len();
        let state = LogState::from_records(records, &policy);
        info!(
            log = %name,
            loaded = loaded,
            retained = state.entries.len(),
            capacity = policy.capacity(),
            "Event log opened"
        );

        Self {
            name,
            policy,
            backend,
            state: Mutex::new(state),
        }
    }

    /// Open a log over a fresh in-memory backend
    pub async fn in_memory(name: impl Into<String>, policy: RetentionPolicy) -> Self {
        Self::open(name, policy, Arc::new(crate::MemoryBackend::<T>::new())).await
    }

    /// Append a payload at the tail
    ///
    /// On a backend failure the error is returned and the log is left
    /// exactly as it was.
    #[instrument(skip(self, payload), fields(log = %self.name))]
    pub async fn append(&self, payload: T) -> Result<Ack, StorageError> {
        let mut state = self.state.lock().await;

        let key = payload.dedupe_key();
        if self.policy.drops_repeats() && state.keys.contains(&key) {
            debug!("Duplicate entry, not stored");
            return Ok(Ack::Duplicate);
        }

        let mut next = state.entries.clone();
        next.push_back(LogRecord::new(payload));
        let evicted = self.policy.trim(&mut next);

        self.backend.persist(next.make_contiguous()).await?;

        state.entries = next;
        if self.policy.drops_repeats() {
            for record in &evicted {
                state.keys.remove(&record.payload.dedupe_key());
            }
            state.keys.insert(key);
        }

        debug!(
            len = state.entries.len(),
            evicted = evicted.len(),
            "Appended entry"
        );
        Ok(Ack::Appended {
            evicted: evicted.len(),
        })
    }

    /// Current contents, oldest first
    pub async fn list(&self) -> Vec<LogRecord<T>> {
        self.state.lock().await.entries.iter().cloned().collect()
    }

    /// Count entries and distinct keys, and take the newest `recent`
    pub async fn summarize<K, F>(&self, recent: usize, key: F) -> Summary<T>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        let state = self.state.lock().await;
        let unique: HashSet<K> = state.entries.iter().map(|r| key(&r.payload)).collect();
        let skip = state.entries.len().saturating_sub(recent);

        Summary {
            total_count: state.entries.len(),
            unique_key_count: unique.len(),
            most_recent: state.entries.iter().skip(skip).cloned().collect(),
        }
    }

    /// Number of retained entries
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Check if the log holds nothing
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }

    /// Get the log name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the retention policy
    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Which backend this log writes to
    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }
}

impl<T: LogPayload> std::fmt::Debug for EventLog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("backend", &self.backend.kind())
            .finish_non_exhaustive()
    }
}
