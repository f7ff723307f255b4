//! Generic persisted state container.
//!
//! Holds one value of type `T` in memory and mirrors it to a
//! [`KeyValueStore`]. The in-memory value is always valid: it starts at
//! [`PersistedValue::bootstrap`], may be replaced once by [`PersistedState::load`],
//! and afterwards changes only through [`PersistedState::update`], which
//! writes to storage before anything becomes visible to readers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::storage::KeyValueStore;

use super::model::PersistedValue;

/// Single source of truth for a persisted value.
///
/// # Lifecycle
///
/// 1. [`initialize`](Self::initialize): synchronous, no I/O, value = bootstrap.
/// 2. [`load`](Self::load): reads storage once; failures are logged and swallowed.
/// 3. [`update`](Self::update): storage write first, then in-memory assignment.
///
/// Overlapping updates are not serialized; the last one to finish its write
/// wins.
pub struct PersistedState<T: PersistedValue> {
    store: Arc<dyn KeyValueStore>,
    value: RwLock<T>,
    /// Bumped on every committed update, guarded by the `value` write lock.
    generation: AtomicU64,
    load_started: AtomicBool,
    loaded: AtomicBool,
}

impl<T: PersistedValue> PersistedState<T> {
    /// Creates the container with the bootstrap value.
    pub fn initialize(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            value: RwLock::new(T::bootstrap()),
            generation: AtomicU64::new(0),
            load_started: AtomicBool::new(false),
            loaded: AtomicBool::new(false),
        }
    }

    /// Restores the persisted value, if there is a valid one.
    ///
    /// Only the first call reads storage. A value read after an update has
    /// already been committed is discarded.
    pub async fn load(&self) {
        if self.load_started.swap(true, Ordering::SeqCst) {
            tracing::debug!(key = T::KEY, "load already performed, skipping");
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);

        match self.store.get(T::KEY).await {
            Ok(Some(raw)) => match T::decode(&raw) {
                Some(restored) => {
                    let mut value = self.write_value();
                    if self.generation.load(Ordering::SeqCst) == generation {
                        *value = restored;
                        tracing::debug!(key = T::KEY, "restored persisted value");
                    } else {
                        tracing::debug!(
                            key = T::KEY,
                            "persisted value superseded by a newer update"
                        );
                    }
                }
                None => {
                    tracing::warn!(key = T::KEY, "persisted value is invalid, keeping default");
                }
            },
            Ok(None) => {
                tracing::debug!(key = T::KEY, "nothing persisted, keeping default");
            }
            Err(e) => {
                tracing::warn!(key = T::KEY, error = %e, "failed to read persisted value");
            }
        }

        self.loaded.store(true, Ordering::SeqCst);
    }

    /// Persists `new_value`, then makes it visible.
    ///
    /// On a storage failure the in-memory value is left untouched and the
    /// error is returned.
    pub async fn update(&self, new_value: T) -> Result<()> {
        let write = match new_value.encode()? {
            Some(raw) => self.store.set(T::KEY, &raw).await,
            None => self.store.remove(T::KEY).await,
        };

        if let Err(e) = write {
            tracing::warn!(key = T::KEY, error = %e, "failed to persist value");
            return Err(e);
        }

        let mut value = self.write_value();
        *value = new_value;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Returns the in-memory value. Never touches storage.
    pub fn current_value(&self) -> T {
        self.read_value().clone()
    }

    /// Whether [`load`](Self::load) has finished.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn read_value(&self) -> RwLockReadGuard<'_, T> {
        self.value
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_value(&self) -> RwLockWriteGuard<'_, T> {
        self.value
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: PersistedValue + std::fmt::Debug> std::fmt::Debug for PersistedState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedState")
            .field("key", &T::KEY)
            .field("value", &*self.read_value())
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
