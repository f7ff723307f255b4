//! Persisted sign-in session.

use std::sync::Arc;

use crate::error::{PostboxError, Result};
use crate::state::{PersistedState, PersistedValue};
use crate::storage::KeyValueStore;

use super::model::AuthSession;

/// Signed-out is `None`; signing out removes the stored record.
impl PersistedValue for Option<AuthSession> {
    const KEY: &'static str = "auth_session";

    fn bootstrap() -> Self {
        None
    }

    fn encode(&self) -> Result<Option<String>> {
        self.as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(PostboxError::from)
    }

    fn decode(raw: &str) -> Option<Self> {
        AuthSession::from_json(raw).map(Some)
    }
}

/// Process-wide sign-in state.
///
/// The persisted record is written before a session change becomes visible,
/// so consumers never observe a session that would not survive a restart.
#[derive(Debug)]
pub struct AuthState {
    inner: PersistedState<Option<AuthSession>>,
}

impl AuthState {
    /// Creates a signed-out container. Performs no I/O.
    pub fn initialize(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: PersistedState::initialize(store),
        }
    }

    /// Restores a previously persisted session, if it is well-formed.
    pub async fn load(&self) {
        self.inner.load().await;
    }

    /// Replaces the session; `None` signs out.
    pub async fn update(&self, session: Option<AuthSession>) -> Result<()> {
        self.inner.update(session).await
    }

    /// Persists and publishes a freshly issued session.
    pub async fn sign_in(&self, session: AuthSession) -> Result<()> {
        let user_id = session.user_id().to_string();
        self.update(Some(session)).await?;
        tracing::info!(user_id = %user_id, "signed in");
        Ok(())
    }

    /// Removes the persisted session, then clears it.
    ///
    /// On failure the previous session stays visible.
    pub async fn sign_out(&self) -> Result<()> {
        self.update(None).await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// The current session, if any.
    pub fn current_value(&self) -> Option<AuthSession> {
        self.inner.current_value()
    }

    /// The current session, or `NotSignedIn`.
    ///
    /// Every backend call that needs a user id goes through here.
    pub fn require_session(&self) -> Result<AuthSession> {
        self.current_value().ok_or(PostboxError::NotSignedIn)
    }

    pub fn user_id(&self) -> Option<String> {
        self.current_value().map(|s| s.user_id().to_string())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_value().is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }
}
