//! Application layer for Postbox.
//!
//! Wires the persisted state containers to the mail backend: the
//! [`AppContext`] that owns the containers, and the use cases the screens
//! call.

pub mod auth_service;
pub mod context;
pub mod mailbox_service;
pub mod settings_service;

#[cfg(test)]
mod testing;

pub use auth_service::AuthService;
pub use context::{AppContext, ContextHandle};
pub use mailbox_service::MailboxService;
pub use settings_service::SettingsService;
