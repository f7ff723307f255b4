//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `model`: the signed-in [`AuthSession`]
//! - `state`: the persisted session container
//!
//! # Usage
//!
//! ```ignore
//! use postbox_core::auth::{AuthSession, AuthState};
//! ```

mod model;
mod state;

pub use model::AuthSession;
pub use state::AuthState;
