//! Values that can live in a persisted state container.

use crate::error::Result;

/// A value held by a [`PersistedState`](super::PersistedState).
///
/// Implementors decide the storage key, the bootstrap value used before
/// anything is loaded, and the textual encoding written to storage.
pub trait PersistedValue: Clone + Send + Sync + 'static {
    /// Storage key the value is persisted under.
    const KEY: &'static str;

    /// Statically known value available before any load completes.
    fn bootstrap() -> Self;

    /// Serialized form to write. `None` removes the key instead.
    fn encode(&self) -> Result<Option<String>>;

    /// Parses a persisted record.
    ///
    /// Returns `None` for anything malformed or no longer valid; callers
    /// treat that exactly like a missing record.
    fn decode(raw: &str) -> Option<Self>;
}
