//! Error types for notelink.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using notelink's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notelink operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found, or owned by someone else.
    ///
    /// Absence and foreign ownership share this variant so callers cannot
    /// probe for other users' notes.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid request field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Identifier that does not parse as a note/user id
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// The `(source, target)` edge already exists.
    #[error("Link already exists: {from_note_id} -> {to_note_id}")]
    DuplicateLink { from_note_id: Uuid, to_note_id: Uuid },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for the benign duplicate-edge race.
    pub fn is_duplicate_link(&self) -> bool {
        matches!(self, Error::DuplicateLink { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("serialization: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("Note not found or access denied".to_string());
        assert_eq!(err.to_string(), "Not found: Note not found or access denied");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("noteId is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: noteId is required");
    }

    #[test]
    fn test_error_display_invalid_id() {
        let err = Error::InvalidId("not-a-uuid".to_string());
        assert_eq!(err.to_string(), "Invalid identifier: not-a-uuid");
    }

    #[test]
    fn test_error_display_duplicate_link() {
        let from_note_id = Uuid::nil();
        let to_note_id = Uuid::from_u128(1);
        let err = Error::DuplicateLink {
            from_note_id,
            to_note_id,
        };
        assert_eq!(
            err.to_string(),
            format!("Link already exists: {} -> {}", from_note_id, to_note_id)
        );
    }

    #[test]
    fn test_is_duplicate_link() {
        let dup = Error::DuplicateLink {
            from_note_id: Uuid::nil(),
            to_note_id: Uuid::from_u128(2),
        };
        assert!(dup.is_duplicate_link());
        assert!(!Error::Internal("boom".to_string()).is_duplicate_link());
        assert!(!Error::Database(sqlx::Error::RowNotFound).is_duplicate_link());
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: Error = sqlx::Error::RowNotFound.into();
        match err {
            Error::Database(_) => {}
            _ => panic!("Expected Database error"),
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("Internal error: serialization"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
