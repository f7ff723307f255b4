//! Mailbox wire models.
//!
//! These mirror the backend's JSON contract field for field, so they use
//! the backend's snake_case names.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Folder selected when none is given.
pub const DEFAULT_FOLDER: &str = "INBOX";

/// Page size used by the backend when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// IMAP server settings sent at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImapConfig {
    pub host: String,
    #[serde(default = "ImapConfig::default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub use_ssl: bool,
}

impl ImapConfig {
    fn default_port() -> u16 {
        993
    }

    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::default_port(),
            use_ssl: true,
        }
    }
}

/// SMTP server settings sent at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "SmtpConfig::default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub use_tls: bool,
}

impl SmtpConfig {
    fn default_port() -> u16 {
        587
    }

    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::default_port(),
            use_tls: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Credentials and server settings for `POST /api/auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub imap_config: ImapConfig,
    pub smtp_config: SmtpConfig,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("imap_config", &self.imap_config)
            .field("smtp_config", &self.smtp_config)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// A file attached to a message. `content` is base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAttachment {
    pub filename: String,
    pub content: String,
    pub content_type: String,
    pub size: u64,
}

/// A message cached by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    #[serde(default)]
    pub message_id: Option<String>,
    pub subject: String,
    pub from_address: String,
    #[serde(default)]
    pub to_address: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cc_address: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body_html: String,
    #[serde(default)]
    pub attachments: Vec<EmailAttachment>,
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(deserialize_with = "flexible_datetime")]
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_flexible_datetime")]
    pub cached_at: Option<DateTime<Utc>>,
    pub user_id: String,
}

impl EmailMessage {
    /// Plain-text body, falling back to the HTML body.
    pub fn body(&self) -> &str {
        if self.body_text.trim().is_empty() {
            &self.body_html
        } else {
            &self.body_text
        }
    }

    /// First line of the body, trimmed to `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self
            .body()
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or_default();
        if line.chars().count() <= max_chars {
            return line.to_string();
        }
        let mut preview: String = line.chars().take(max_chars).collect();
        preview.push('…');
        preview
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

/// Body for `POST /api/emails/sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub user_id: String,
    pub folder: String,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub message: String,
    pub synced_count: u32,
}

/// Listing parameters for `GET /api/emails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailQuery {
    pub folder: String,
    pub limit: u32,
    pub skip: u32,
}

impl Default for EmailQuery {
    fn default() -> Self {
        Self {
            folder: DEFAULT_FOLDER.to_string(),
            limit: DEFAULT_PAGE_SIZE,
            skip: 0,
        }
    }
}

/// Body for `POST /api/emails/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub user_id: String,
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<EmailAttachment>,
}

/// A mailbox folder with its message count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    pub name: String,
    pub message_count: u32,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 timestamps and naive ISO-8601 ones (taken as UTC).
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

fn optional_flexible_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_datetime(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const BACKEND_EMAIL: &str = r#"{
        "id": "e-1",
        "message_id": "<abc@mail.example>",
        "subject": "Quarterly report",
        "from_address": "boss@example.com",
        "to_address": ["a@b.com"],
        "cc_address": null,
        "body_text": "",
        "body_html": "<p>See attached</p>",
        "attachments": [
            {"filename": "q3.pdf", "content": "JVBERi0=", "content_type": "application/pdf", "size": 5}
        ],
        "folder": "INBOX",
        "is_read": false,
        "date": "2024-03-05T09:30:00",
        "cached_at": "2024-03-05T09:31:12.123456",
        "user_id": "u1"
    }"#;

    #[test]
    fn test_parse_backend_email() {
        let email: EmailMessage = serde_json::from_str(BACKEND_EMAIL).unwrap();
        assert_eq!(email.id, "e-1");
        assert!(email.cc_address.is_empty());
        assert_eq!(email.body(), "<p>See attached</p>");
        assert!(email.has_attachments());
        assert_eq!(email.attachments[0].size, 5);
        assert_eq!(email.date.year(), 2024);
        assert_eq!(email.date.hour(), 9);
        assert!(email.cached_at.is_some());
    }

    #[test]
    fn test_parse_datetime_variants() {
        let with_offset = parse_datetime("2024-03-05T09:30:00+02:00").unwrap();
        assert_eq!(with_offset.hour(), 7);

        let zulu = parse_datetime("2024-03-05T09:30:00Z").unwrap();
        assert_eq!(zulu.hour(), 9);

        assert!(parse_datetime("2024-03-05T09:30:00.5").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn test_minimal_email_uses_defaults() {
        let email: EmailMessage = serde_json::from_str(
            r#"{"id":"e-2","subject":"Hi","from_address":"x@y.z","date":"2024-01-01T00:00:00Z","user_id":"u1"}"#,
        )
        .unwrap();
        assert_eq!(email.folder, DEFAULT_FOLDER);
        assert!(!email.is_read);
        assert!(email.cached_at.is_none());
        assert!(email.message_id.is_none());
    }

    #[test]
    fn test_preview() {
        let mut email: EmailMessage = serde_json::from_str(BACKEND_EMAIL).unwrap();
        email.body_text = "\n  Hello there, this is a long first line\nsecond".to_string();
        assert_eq!(email.preview(11), "Hello there…");
        assert_eq!(email.preview(100), "Hello there, this is a long first line");
    }

    #[test]
    fn test_login_request_defaults_and_redaction() {
        let request: LoginRequest = serde_json::from_str(
            r#"{"email":"a@b.com","password":"hunter2","imap_config":{"host":"imap.b.com"},"smtp_config":{"host":"smtp.b.com"}}"#,
        )
        .unwrap();
        assert_eq!(request.imap_config, ImapConfig::new("imap.b.com"));
        assert_eq!(request.smtp_config.port, 587);
        assert!(request.smtp_config.use_tls);
        assert!(!format!("{request:?}").contains("hunter2"));
    }
}
