//! Outgoing message drafts.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::error::{PostboxError, Result};

use super::model::{EmailAttachment, SendEmailRequest};

/// A message being written on the compose screen.
///
/// Recipients are entered as comma or semicolon separated lists and are
/// validated only when the draft is turned into a send request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeDraft {
    pub to: String,
    pub cc: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<EmailAttachment>,
}

impl ComposeDraft {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = cc.into();
        self
    }

    /// Attaches raw bytes, base64-encoding them for the wire.
    pub fn with_attachment(
        mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        self.attachments.push(EmailAttachment {
            filename: filename.into(),
            content: BASE64_STANDARD.encode(bytes),
            content_type: content_type.into(),
            size: bytes.len() as u64,
        });
        self
    }

    /// Validates the draft and builds the send request for `user_id`.
    pub fn into_request(self, user_id: &str) -> Result<SendEmailRequest> {
        let to = parse_recipients(&self.to)?;
        if to.is_empty() {
            return Err(PostboxError::invalid_input("at least one recipient is required"));
        }
        let cc = parse_recipients(&self.cc)?;

        Ok(SendEmailRequest {
            user_id: user_id.to_string(),
            to,
            cc,
            subject: self.subject.trim().to_string(),
            body: self.body,
            attachments: self.attachments,
        })
    }
}

/// Splits a recipient list, rejecting anything that is not an address.
pub(crate) fn parse_recipients(raw: &str) -> Result<Vec<String>> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(|addr| {
            let valid = addr
                .split_once('@')
                .is_some_and(|(local, domain)| {
                    !local.is_empty() && domain.contains('.') && !addr.contains(char::is_whitespace)
                });
            if valid {
                Ok(addr.to_string())
            } else {
                Err(PostboxError::invalid_input(format!(
                    "'{addr}' is not a valid email address"
                )))
            }
        })
        .collect()
}
