//! Client core of the Postbox mobile mail app.
//!
//! Holds the persisted theme and sign-in state every screen reads, the
//! storage abstraction they persist through, and the models of the mail
//! backend's JSON contract.

pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod state;
pub mod storage;
pub mod theme;

// Re-export common error type
pub use error::{PostboxError, Result};
