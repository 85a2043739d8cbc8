//! Persistent storage backend
//!
//! This module provides a file-backed backend. Each log is a single JSON
//! snapshot replaced atomically on every write:
//!
//! 1. Write to `<name>.json.tmp`
//! 2. Optionally fsync the temp file
//! 3. Rename over `<name>.json`
//!
//! A crash mid-write leaves the previous snapshot intact

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::LogBackend;
use crate::error::StorageError;
use crate::record::{LogPayload, LogRecord};

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk layout of a log snapshot
#[derive(Debug, Deserialize)]
struct Snapshot<T> {
    version: u32,
    entries: Vec<LogRecord<T>>,
}

/// Borrowed form of [`Snapshot`] for writing
#[derive(Serialize)]
struct SnapshotRef<'a, T> {
    version: u32,
    entries: &'a [LogRecord<T>],
}

/// Persistent implementation of LogBackend
///
/// Holds no cache of its own: the owning [`EventLog`](crate::EventLog)
/// keeps the in-memory copy and loads from here once at startup.
#[derive(Debug)]
pub struct FileBackend<T> {
    /// Path of the snapshot file
    path: PathBuf,
    /// Whether to sync writes immediately (durability vs performance)
    sync_writes: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FileBackend<T> {
    /// Create a backend storing `<dir>/<name>.json`
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self::with_options(dir, name, true)
    }

    /// Create with explicit sync behaviour
    pub fn with_options(dir: impl AsRef<Path>, name: &str, sync_writes: bool) -> Self {
        Self {
            path: dir.as_ref().join(format!("{name}.json")),
            sync_writes,
            _marker: PhantomData,
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl<T: LogPayload> LogBackend<T> for FileBackend<T> {
    async fn load(&self) -> Result<Vec<LogRecord<T>>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No existing snapshot, starting fresh");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot<T> = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::deserialization(e.to_string()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        info!(
            path = %self.path.display(),
            entries = snapshot.entries.len(),
            "Loaded log snapshot"
        );
        Ok(snapshot.entries)
    }

    async fn persist(&self, entries: &[LogRecord<T>]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            entries,
        };
        let bytes = serde_json::to_vec(&snapshot)
            .map_err(|e| StorageError::serialization(e.to_string()))?;

        let tmp_path = self.tmp_path();
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)
                .await?;
            file.write_all(&bytes).await?;
            if self.sync_writes {
                file.sync_data().await?;
            }
        }

        fs::rename(&tmp_path, &self.path).await?;

        debug!(
            path = %self.path.display(),
            entries = entries.len(),
            bytes = bytes.len(),
            "Persisted log snapshot"
        );
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}
