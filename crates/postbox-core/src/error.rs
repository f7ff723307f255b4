//! Error types for the Postbox client.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire Postbox client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize)]
pub enum PostboxError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Persistent storage rejected or failed a read/write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A session record that is missing its user id or has a malformed email
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// A mailbox operation was attempted without a signed-in session
    #[error("Not signed in")]
    NotSignedIn,

    /// The owning application context no longer exists
    #[error("Application context unavailable: {0}")]
    ContextUnavailable(&'static str),

    /// User input rejected before reaching the backend
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend rejected the credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend returned a non-success status
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure talking to the backend
    #[error("Network error: {0}")]
    Network(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PostboxError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a storage or IO failure
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io { .. })
    }

    /// Check if this error came from missing authentication
    pub fn is_not_signed_in(&self) -> bool {
        matches!(self, Self::NotSignedIn)
    }

    /// Check if the backend could not be reached at all
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PostboxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PostboxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PostboxError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PostboxError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error
impl From<anyhow::Error> for PostboxError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PostboxError>`.
pub type Result<T> = std::result::Result<T, PostboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let err: PostboxError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(err.is_storage());
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: PostboxError = parse.into();
        assert!(matches!(err, PostboxError::Serialization { ref format, .. } if format == "JSON"));
    }

    #[test]
    fn test_type_checks() {
        assert!(PostboxError::NotSignedIn.is_not_signed_in());
        assert!(PostboxError::not_found("email", "e-1").is_not_found());
        assert!(PostboxError::Network("refused".into()).is_network());
        assert!(!PostboxError::storage("disk full").is_network());
    }
}
