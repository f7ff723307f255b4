//! On-disk key-value store.
//!
//! Persists every key in one JSON object (`state.json`). Each write is a
//! locked read-modify-write followed by an atomic replace, so a crash
//! mid-write leaves the previous document intact.

use async_trait::async_trait;
use postbox_core::storage::KeyValueStore;
use postbox_core::{PostboxError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::atomic::{FileLock, read_optional, write_atomic};
use crate::paths::PostboxPaths;

type Entries = BTreeMap<String, String>;

/// [`KeyValueStore`] backed by a single JSON document.
///
/// File I/O runs on the blocking pool. Writes from one process are
/// serialized in-process; the file lock covers other processes.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: Arc<PathBuf>,
    write_guard: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            write_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Store at the default `state.json` location.
    pub fn from_paths(paths: &PostboxPaths) -> Result<Self> {
        Ok(Self::new(paths.state_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<Entries> {
        match read_optional(path)? {
            Some(content) => serde_json::from_str(&content).map_err(PostboxError::from),
            None => Ok(Entries::new()),
        }
    }

    fn modify<F>(path: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&mut Entries),
    {
        let _lock = FileLock::acquire(path)?;

        // A corrupt document is replaced rather than blocking every future write
        let mut entries = Self::read_entries(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "discarding unreadable state document");
            Entries::new()
        });
        f(&mut entries);

        let json = serde_json::to_string_pretty(&entries)?;
        write_atomic(path, json.as_bytes())
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
    {
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || f(&path))
            .await
            .map_err(|e| PostboxError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |path| {
            let mut entries = Self::read_entries(path)?;
            Ok(entries.remove(&key))
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        let key = key.to_string();
        let value = value.to_string();
        self.run_blocking(move |path| {
            Self::modify(path, |entries| {
                entries.insert(key, value);
            })
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        let key = key.to_string();
        self.run_blocking(move |path| {
            Self::modify(path, |entries| {
                entries.remove(&key);
            })
        })
        .await
    }
}
