//! In-memory [`MailApi`] used by the service tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use postbox_core::mail::{
    EmailMessage, EmailQuery, FolderInfo, LoginRequest, LoginResponse, MailApi, SendEmailRequest,
    SyncRequest, SyncResponse,
};
use postbox_core::{PostboxError, Result};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub(crate) struct FakeMailApi {
    pub emails: Mutex<Vec<EmailMessage>>,
    pub sent: Mutex<Vec<SendEmailRequest>>,
    pub calls: Mutex<Vec<String>>,
    pub offline: AtomicBool,
}

impl FakeMailApi {
    pub fn with_inbox() -> Self {
        let api = Self::default();
        *api.emails.lock().unwrap() = vec![
            sample_email("e-1", "Quarterly report", 10),
            sample_email("e-2", "Lunch plans", 20),
        ];
        api
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) -> Result<()> {
        self.calls.lock().unwrap().push(call.into());
        if self.offline.load(Ordering::SeqCst) {
            return Err(PostboxError::Network("connection refused".into()));
        }
        Ok(())
    }

    fn find(&self, user_id: &str, email_id: &str) -> Result<usize> {
        self.emails
            .lock()
            .unwrap()
            .iter()
            .position(|e| e.id == email_id && e.user_id == user_id)
            .ok_or_else(|| PostboxError::not_found("email", email_id))
    }
}

pub(crate) fn sample_email(id: &str, subject: &str, minute: u32) -> EmailMessage {
    EmailMessage {
        id: id.to_string(),
        message_id: None,
        subject: subject.to_string(),
        from_address: "boss@example.com".to_string(),
        to_address: vec!["a@b.com".to_string()],
        cc_address: Vec::new(),
        body_text: format!("About {subject}"),
        body_html: String::new(),
        attachments: Vec::new(),
        folder: "INBOX".to_string(),
        is_read: false,
        date: Utc.with_ymd_and_hms(2024, 3, 5, 9, minute, 0).unwrap(),
        cached_at: None,
        user_id: "u1".to_string(),
    }
}

#[async_trait]
impl MailApi for FakeMailApi {
    async fn health(&self) -> Result<String> {
        self.record("health")?;
        Ok("Mail API is running".into())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.record("login")?;
        if request.password != "secret" {
            return Err(PostboxError::Unauthorized("invalid credentials".into()));
        }
        Ok(LoginResponse {
            user_id: "u1".into(),
            email: request.email.clone(),
            message: "Login successful".into(),
        })
    }

    async fn sync(&self, request: &SyncRequest) -> Result<SyncResponse> {
        self.record(format!("sync {} {}", request.folder, request.limit))?;
        Ok(SyncResponse {
            message: "ok".into(),
            synced_count: 0,
        })
    }

    async fn list_emails(&self, user_id: &str, query: &EmailQuery) -> Result<Vec<EmailMessage>> {
        self.record(format!("list {} {} {}", query.folder, query.limit, query.skip))?;
        let mut emails: Vec<EmailMessage> = self
            .emails
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.folder == query.folder)
            .cloned()
            .collect();
        emails.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(emails
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn search_emails(
        &self,
        user_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<EmailMessage>> {
        self.record(format!("search {query} {limit}"))?;
        let needle = query.to_lowercase();
        Ok(self
            .emails
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.subject.to_lowercase().contains(&needle))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_email(&self, user_id: &str, email_id: &str) -> Result<EmailMessage> {
        self.record(format!("get {email_id}"))?;
        let index = self.find(user_id, email_id)?;
        Ok(self.emails.lock().unwrap()[index].clone())
    }

    async fn set_read(&self, user_id: &str, email_id: &str, is_read: bool) -> Result<()> {
        self.record(format!("set_read {email_id} {is_read}"))?;
        let index = self.find(user_id, email_id)?;
        self.emails.lock().unwrap()[index].is_read = is_read;
        Ok(())
    }

    async fn delete_email(&self, user_id: &str, email_id: &str) -> Result<()> {
        self.record(format!("delete {email_id}"))?;
        let index = self.find(user_id, email_id)?;
        self.emails.lock().unwrap().remove(index);
        Ok(())
    }

    async fn send_email(&self, request: &SendEmailRequest) -> Result<()> {
        self.record("send")?;
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn list_folders(&self, user_id: &str) -> Result<Vec<FolderInfo>> {
        self.record("folders")?;
        let count = self
            .emails
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .count() as u32;
        Ok(vec![FolderInfo {
            name: "INBOX".into(),
            message_count: count,
        }])
    }
}
