//! UUID utilities for note, link, and owner identifiers.
//!
//! New rows use UUIDv7 so ids sort by creation time.

use uuid::Uuid;

use crate::error::{Error, Result};

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use notelink_core::uuid_utils::new_v7;
///
/// let id = new_v7();
/// assert_eq!(id.get_version_num(), 7);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Parse a client-supplied identifier.
///
/// Surrounding whitespace is ignored. Anything that is not a UUID is
/// reported as [`Error::InvalidId`], which the API maps to 400 rather than
/// treating it as an unknown note.
pub fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| Error::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_unique_v7() {
        let first = new_v7();
        let second = new_v7();
        assert_eq!(first.get_version_num(), 7);
        assert_ne!(first, second);
    }

    #[test]
    fn test_parse_id_valid() {
        let id = new_v7();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_id(&format!("  {}  ", id)).unwrap(), id);
    }

    #[test]
    fn test_parse_id_malformed() {
        for raw in ["", "not-a-uuid", "12345", "507f1f77bcf86cd799439011"] {
            match parse_id(raw) {
                Err(Error::InvalidId(msg)) => assert_eq!(msg, raw),
                other => panic!("expected InvalidId for {:?}, got {:?}", raw, other),
            }
        }
    }
}
