//! AuthSession domain model.

use serde::{Deserialize, Serialize};

use crate::error::{PostboxError, Result};

/// Durable record of a signed-in user.
///
/// `user_id` is issued by the backend at login and is opaque to the client.
/// Every mailbox request carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    user_id: String,
    email: String,
}

impl AuthSession {
    /// Creates a session, rejecting records that are not well-formed.
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let session = Self {
            user_id: user_id.into().trim().to_string(),
            email: email.into().trim().to_string(),
        };
        session.validate()?;
        Ok(session)
    }

    /// Parses a stored record; anything malformed yields `None`.
    pub fn from_json(raw: &str) -> Option<Self> {
        let session: Self = serde_json::from_str(raw).ok()?;
        Self::new(session.user_id, session.email).ok()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(PostboxError::InvalidSession("missing user id".into()));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(PostboxError::InvalidSession(format!(
                "malformed email '{}'",
                self.email
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let session = AuthSession::new("u1", "a@b.com").unwrap();
        assert_eq!(session.user_id(), "u1");
        assert_eq!(session.email(), "a@b.com");
    }

    #[test]
    fn test_new_trims() {
        let session = AuthSession::new(" u1 ", " a@b.com\n").unwrap();
        assert_eq!(session.user_id(), "u1");
        assert_eq!(session.email(), "a@b.com");
    }

    #[test]
    fn test_new_rejects_malformed() {
        assert!(matches!(
            AuthSession::new("", "a@b.com"),
            Err(PostboxError::InvalidSession(_))
        ));
        assert!(AuthSession::new("u1", "").is_err());
        assert!(AuthSession::new("u1", "not-an-email").is_err());
        assert!(AuthSession::new("u1", "@b.com").is_err());
        assert!(AuthSession::new("u1", "a@").is_err());
    }

    #[test]
    fn test_json_shape() {
        let session = AuthSession::new("u1", "a@b.com").unwrap();
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(json, r#"{"userId":"u1","email":"a@b.com"}"#);
        assert_eq!(AuthSession::from_json(&json), Some(session));
    }

    #[test]
    fn test_from_json_normalizes_like_new() {
        let stored = AuthSession::from_json(r#"{"userId":" u1 ","email":" a@b.com\n"}"#).unwrap();
        assert_eq!(stored, AuthSession::new("u1", "a@b.com").unwrap());
        assert_eq!(stored.user_id(), "u1");
        assert!(AuthSession::from_json(r#"{"userId":"   ","email":"a@b.com"}"#).is_none());
    }

    #[test]
    fn test_from_json_rejects_corrupt_records() {
        assert!(AuthSession::from_json("").is_none());
        assert!(AuthSession::from_json(r#"{"userId":"u1""#).is_none());
        assert!(AuthSession::from_json(r#"{"userId":"","email":"a@b.com"}"#).is_none());
        assert!(AuthSession::from_json(r#"{"email":"a@b.com"}"#).is_none());
        assert!(AuthSession::from_json(r#"{"userId":"u1","email":"nope"}"#).is_none());
    }
}
