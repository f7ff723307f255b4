//! Persisted state containers.
//!
//! - `model`: the [`PersistedValue`] contract
//! - `container`: the generic [`PersistedState`] with its
//!   initialize/load/update lifecycle

mod container;
mod model;

pub use container::PersistedState;
pub use model::PersistedValue;
