//! Backend mailbox API trait.

use async_trait::async_trait;

use crate::error::Result;

use super::model::{
    EmailMessage, EmailQuery, FolderInfo, LoginRequest, LoginResponse, SendEmailRequest,
    SyncRequest, SyncResponse,
};

/// The JSON HTTP contract of the mail backend.
///
/// The backend does all IMAP/SMTP work; the client only ever talks to it
/// through these calls. Every call except `login` and `health` is scoped by
/// the signed-in user's id.
#[async_trait]
pub trait MailApi: Send + Sync {
    /// Liveness check, returns the backend's greeting.
    async fn health(&self) -> Result<String>;

    /// Verifies IMAP credentials and registers the account.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// Pulls new messages from the IMAP server into the backend cache.
    async fn sync(&self, request: &SyncRequest) -> Result<SyncResponse>;

    /// Cached messages in a folder, newest first.
    async fn list_emails(&self, user_id: &str, query: &EmailQuery) -> Result<Vec<EmailMessage>>;

    /// Case-insensitive search over subject, sender and body.
    async fn search_emails(
        &self,
        user_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<EmailMessage>>;

    async fn get_email(&self, user_id: &str, email_id: &str) -> Result<EmailMessage>;

    async fn set_read(&self, user_id: &str, email_id: &str, is_read: bool) -> Result<()>;

    /// Deletes a message from the backend cache.
    async fn delete_email(&self, user_id: &str, email_id: &str) -> Result<()>;

    async fn send_email(&self, request: &SendEmailRequest) -> Result<()>;

    async fn list_folders(&self, user_id: &str) -> Result<Vec<FolderInfo>>;
}
