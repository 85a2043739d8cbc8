//! Retention policy for event logs
//!
//! Bounds how many entries a log keeps and whether repeats are stored.
//! Eviction is always first-in-first-out: the oldest entry goes first.

use std::collections::VecDeque;

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 1000;

/// How a log treats a payload whose key is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deduplication {
    /// Store every append (analytics)
    #[default]
    KeepAll,
    /// Acknowledge repeats without storing them (search queries)
    DropRepeats,
}

/// Capacity and deduplication rules for one log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum retained entries
    capacity: usize,
    /// Repeat handling
    deduplication: Deduplication,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            deduplication: Deduplication::default(),
        }
    }
}

impl RetentionPolicy {
    /// Create a policy with the given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            deduplication: Deduplication::default(),
        }
    }

    /// Set the deduplication mode
    pub fn with_deduplication(mut self, deduplication: Deduplication) -> Self {
        self.deduplication = deduplication;
        self
    }

    /// Get the capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether repeats are dropped
    pub fn drops_repeats(&self) -> bool {
        self.deduplication == Deduplication::DropRepeats
    }

    /// How many entries must go so that `current_len + to_add` fits
    pub fn entries_to_evict(&self, current_len: usize, to_add: usize) -> usize {
        current_len
            .saturating_add(to_add)
            .saturating_sub(self.capacity)
    }

    /// Drop entries from the head until `entries` fits, returning the evicted ones
    pub fn trim<T>(&self, entries: &mut VecDeque<T>) -> Vec<T> {
        let excess = self.entries_to_evict(entries.len(), 0);
        entries.drain(..excess).collect()
    }
}
