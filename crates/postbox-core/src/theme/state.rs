//! Persisted active theme.

use std::sync::Arc;

use crate::error::Result;
use crate::state::{PersistedState, PersistedValue};
use crate::storage::KeyValueStore;

use super::model::{Theme, default_theme, find_theme};

/// The theme is persisted as its bare id.
impl PersistedValue for Theme {
    const KEY: &'static str = "theme";

    fn bootstrap() -> Self {
        default_theme().clone()
    }

    fn encode(&self) -> Result<Option<String>> {
        Ok(Some(self.id.clone()))
    }

    fn decode(raw: &str) -> Option<Self> {
        find_theme(raw.trim()).cloned()
    }
}

/// Process-wide active theme.
///
/// Starts at the `default` theme. Only catalog ids are ever accepted, both
/// from storage and from callers.
#[derive(Debug)]
pub struct ThemeState {
    inner: PersistedState<Theme>,
}

impl ThemeState {
    /// Creates the container holding the default theme. Performs no I/O.
    pub fn initialize(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: PersistedState::initialize(store),
        }
    }

    /// Restores the persisted theme choice, if it is still in the catalog.
    pub async fn load(&self) {
        self.inner.load().await;
    }

    /// Switches to the catalog theme `id`.
    ///
    /// Returns `Ok(false)` without touching storage when `id` is not in the
    /// catalog, `Ok(true)` once the choice is persisted and visible.
    pub async fn update(&self, id: &str) -> Result<bool> {
        let Some(theme) = find_theme(id) else {
            tracing::debug!(theme_id = id, "ignoring unknown theme id");
            return Ok(false);
        };

        self.inner.update(theme.clone()).await?;
        tracing::info!(theme_id = id, "theme switched");
        Ok(true)
    }

    /// The active theme.
    pub fn current_value(&self) -> Theme {
        self.inner.current_value()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }
}
