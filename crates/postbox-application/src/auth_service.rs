//! Sign-in use case.

use postbox_core::Result;
use postbox_core::auth::{AuthSession, AuthState};
use postbox_core::mail::{LoginRequest, MailApi};
use std::sync::Arc;

/// Signs the user in against the backend and persists the session.
pub struct AuthService {
    api: Arc<dyn MailApi>,
    auth: Arc<AuthState>,
}

impl AuthService {
    pub fn new(api: Arc<dyn MailApi>, auth: Arc<AuthState>) -> Self {
        Self { api, auth }
    }

    /// Verifies the credentials with the backend, then signs in.
    ///
    /// The session becomes visible only after it has been persisted. A
    /// backend rejection or a failed write leaves the current session as is.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession> {
        let response = self.api.login(&request).await?;
        let session = AuthSession::new(response.user_id, response.email)?;
        self.auth.sign_in(session.clone()).await?;
        Ok(session)
    }

    /// Forgets the persisted session.
    pub async fn logout(&self) -> Result<()> {
        self.auth.sign_out().await
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.auth.current_value()
    }
}
