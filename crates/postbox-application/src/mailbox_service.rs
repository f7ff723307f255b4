//! Mailbox use cases.
//!
//! Every operation requires a signed-in session; without one it fails with
//! `NotSignedIn` before any request is made.

use postbox_core::Result;
use postbox_core::auth::AuthState;
use postbox_core::mail::{
    ComposeDraft, EmailMessage, EmailQuery, FolderInfo, MailApi, SyncRequest,
};
use std::sync::Arc;

pub struct MailboxService {
    api: Arc<dyn MailApi>,
    auth: Arc<AuthState>,
}

impl MailboxService {
    pub fn new(api: Arc<dyn MailApi>, auth: Arc<AuthState>) -> Self {
        Self { api, auth }
    }

    fn user_id(&self) -> Result<String> {
        Ok(self.auth.require_session()?.user_id().to_string())
    }

    /// Pulls new mail into the backend cache, then returns the first page.
    pub async fn refresh(&self, folder: &str, limit: u32) -> Result<Vec<EmailMessage>> {
        let user_id = self.user_id()?;
        let synced = self
            .api
            .sync(&SyncRequest {
                user_id: user_id.clone(),
                folder: folder.to_string(),
                limit,
            })
            .await?;
        tracing::info!(folder, synced = synced.synced_count, "mailbox synced");

        let query = EmailQuery {
            folder: folder.to_string(),
            limit,
            skip: 0,
        };
        self.api.list_emails(&user_id, &query).await
    }

    /// Cached messages only, newest first.
    pub async fn list(&self, folder: &str, limit: u32, skip: u32) -> Result<Vec<EmailMessage>> {
        let user_id = self.user_id()?;
        let query = EmailQuery {
            folder: folder.to_string(),
            limit,
            skip,
        };
        self.api.list_emails(&user_id, &query).await
    }

    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<EmailMessage>> {
        let user_id = self.user_id()?;
        self.api.search_emails(&user_id, query, limit).await
    }

    /// Fetches a message for display and marks it read if it was unread.
    pub async fn open(&self, email_id: &str) -> Result<EmailMessage> {
        let user_id = self.user_id()?;
        let mut email = self.api.get_email(&user_id, email_id).await?;
        if !email.is_read {
            self.api.set_read(&user_id, email_id, true).await?;
            email.is_read = true;
        }
        Ok(email)
    }

    pub async fn set_read(&self, email_id: &str, is_read: bool) -> Result<()> {
        let user_id = self.user_id()?;
        self.api.set_read(&user_id, email_id, is_read).await
    }

    pub async fn delete(&self, email_id: &str) -> Result<()> {
        let user_id = self.user_id()?;
        self.api.delete_email(&user_id, email_id).await?;
        tracing::info!(email_id, "email deleted");
        Ok(())
    }

    pub async fn folders(&self) -> Result<Vec<FolderInfo>> {
        let user_id = self.user_id()?;
        self.api.list_folders(&user_id).await
    }

    /// Validates the draft and hands it to the backend for delivery.
    pub async fn send(&self, draft: ComposeDraft) -> Result<()> {
        let user_id = self.user_id()?;
        let request = draft.into_request(&user_id)?;
        let recipients = request.to.len() + request.cc.len();
        self.api.send_email(&request).await?;
        tracing::info!(recipients, "email sent");
        Ok(())
    }
}
