//! Error types for LockNote core operations.
//!
//! Every per-request failure is a `LockNoteError`. The service boundary turns
//! these into a tagged [`Outcome`](crate::service::Outcome) so callers can
//! tell failure from success by a single discriminant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for LockNote operations.
pub type Result<T> = std::result::Result<T, LockNoteError>;

/// Core error type for LockNote operations.
#[derive(Debug, Error)]
pub enum LockNoteError {
    /// Missing content, missing password, bad tags
    #[error("Validation error: {0}")]
    Validation(String),

    /// Note id not present in the document
    #[error("Note not found: {0}")]
    NotFound(i64),

    /// Mutation attempted on a soft-deleted note
    #[error("Note {0} is in the trash")]
    Trashed(i64),

    /// Wrong unlock password
    #[error("Incorrect password")]
    Authentication,

    /// Corrupt ciphertext/IV or key mismatch
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Malformed master key. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O failure reading or persisting the document
    #[error("Storage error: {0}")]
    Storage(String),

    /// Hashing or random number generation failure
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// JSON serialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl From<std::io::Error> for LockNoteError {
    fn from(err: std::io::Error) -> Self {
        LockNoteError::Storage(err.to_string())
    }
}

/// Serializable discriminant for a [`LockNoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Trashed,
    Authentication,
    Decryption,
    Configuration,
    Storage,
    Crypto,
}

impl LockNoteError {
    /// Classify this error for the presentation boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LockNoteError::Validation(_) => ErrorKind::Validation,
            LockNoteError::NotFound(_) => ErrorKind::NotFound,
            LockNoteError::Trashed(_) => ErrorKind::Trashed,
            LockNoteError::Authentication => ErrorKind::Authentication,
            LockNoteError::Decryption(_) => ErrorKind::Decryption,
            LockNoteError::Configuration(_) => ErrorKind::Configuration,
            LockNoteError::Storage(_) | LockNoteError::Json { .. } => ErrorKind::Storage,
            LockNoteError::Crypto(_) => ErrorKind::Crypto,
        }
    }

    /// Only configuration errors stop the application from serving notes.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LockNoteError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(LockNoteError::NotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(LockNoteError::Authentication.kind(), ErrorKind::Authentication);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(LockNoteError::from(io).kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(LockNoteError::Configuration("bad key".to_string()).is_fatal());
        assert!(!LockNoteError::Storage("io".to_string()).is_fatal());
        assert!(!LockNoteError::Authentication.is_fatal());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
    }

    #[test]
    fn test_messages() {
        assert_eq!(LockNoteError::Authentication.to_string(), "Incorrect password");
        assert_eq!(LockNoteError::Trashed(3).to_string(), "Note 3 is in the trash");
    }
}
