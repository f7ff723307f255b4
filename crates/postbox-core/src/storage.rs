//! Durable key-value storage abstraction.
//!
//! State containers persist through this trait so any store with
//! get/set/remove by string key can back them.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::error::{PostboxError, Result};

/// Key-value store addressed by string keys.
///
/// Values are opaque serialized records. Implementations must make a
/// successful `set`/`remove` durable before returning.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store.
///
/// Nothing survives the process, so this is mostly useful for tests and as a
/// fallback when no on-disk location is available. Reads and writes can be
/// made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries_mut().insert(key.into(), value.into());
        store
    }

    /// Makes every subsequent `get` fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set`/`remove` fail until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Synchronous peek at the raw stored value.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries_mut().get(key).cloned()
    }

    /// Drops every entry, simulating a wiped device.
    pub fn clear(&self) {
        self.entries_mut().clear();
    }

    fn entries_mut(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Every critical section is a single map operation
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_write(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PostboxError::storage(format!("write rejected for '{key}'")));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PostboxError::storage(format!("read failed for '{key}'")));
        }
        Ok(self.entries_mut().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_write(key)?;
        self.entries_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_write(key)?;
        self.entries_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("theme").await.unwrap(), None);

        store.set("theme", "dark").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));

        store.remove("theme").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), None);

        // Removing twice is fine
        store.remove("theme").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_write_leaves_value() {
        let store = MemoryStore::with_entry("theme", "ocean");
        store.fail_writes(true);

        assert!(store.set("theme", "dark").await.is_err());
        assert!(store.remove("theme").await.is_err());
        assert_eq!(store.raw("theme").as_deref(), Some("ocean"));
    }

    #[tokio::test]
    async fn test_failed_read() {
        let store = MemoryStore::with_entry("theme", "ocean");
        store.fail_reads(true);
        assert!(store.get("theme").await.is_err());

        store.fail_reads(false);
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("ocean"));
    }
}
