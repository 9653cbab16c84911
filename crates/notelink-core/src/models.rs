//! Core data models for notelink.
//!
//! These types are shared across all notelink crates and represent
//! the core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A note owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// The projection of a source note returned by a backlink query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }
}

/// Request for creating a note.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
}

impl CreateNoteRequest {
    /// An empty-content note, as auto-created for a not-yet-written title.
    pub fn stub(owner_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            owner_id,
            title: title.into(),
            content: String::new(),
        }
    }
}

/// Outcome of resolving a referenced title to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedNote {
    pub id: Uuid,
    /// True when the note did not exist and was created as a stub.
    pub created: bool,
}

// =============================================================================
// LINK TYPES
// =============================================================================

/// Directed edge from a referencing note to a referenced note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Link {
    pub id: Uuid,
    pub from_note_id: Uuid,
    pub to_note_id: Uuid,
    pub owner_id: Uuid,
    pub created_at_utc: DateTime<Utc>,
}

// =============================================================================
// RECONCILIATION TYPES
// =============================================================================

/// The step of reconciliation that failed for a [`LinkFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LinkFailureKind {
    /// Resolving (or creating) the note for a referenced title.
    Resolve,
    /// Inserting a new edge.
    Create,
    /// Bulk removal of stale edges.
    Delete,
}

/// A per-title or per-edge failure that did not abort reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkFailure {
    pub kind: LinkFailureKind,
    /// Referenced title, for resolve failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Target note, for create failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_note_id: Option<Uuid>,
    pub error: String,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReconcileSummary {
    /// Titles successfully resolved to a note id.
    pub targets_resolved: usize,
    /// Notes auto-created as empty stubs during resolution.
    pub stubs_created: usize,
    pub links_created: usize,
    pub links_deleted: usize,
    /// Size of the desired edge set (self references excluded).
    pub total_links: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<LinkFailure>,
}

impl ReconcileSummary {
    /// True when every title resolved and every edge operation succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_request_has_empty_content() {
        let owner = Uuid::new_v4();
        let req = CreateNoteRequest::stub(owner, "New Page");
        assert_eq!(req.owner_id, owner);
        assert_eq!(req.title, "New Page");
        assert!(req.content.is_empty());
    }

    #[test]
    fn test_note_summary_from_note() {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "A".to_string(),
            content: "links to [[C]]".to_string(),
            created_at_utc: now,
            updated_at_utc: now,
        };
        let summary = NoteSummary::from(&note);
        assert_eq!(summary.id, note.id);
        assert_eq!(summary.title, "A");
        assert_eq!(summary.content, "links to [[C]]");
    }

    #[test]
    fn test_summary_omits_empty_failures() {
        let summary = ReconcileSummary {
            targets_resolved: 1,
            links_created: 1,
            total_links: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("failures").is_none());
        assert!(summary.is_complete());
    }

    #[test]
    fn test_failure_kind_serializes_snake_case() {
        let failure = LinkFailure {
            kind: LinkFailureKind::Resolve,
            title: Some("Broken".to_string()),
            to_note_id: None,
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "resolve");
        assert_eq!(json["title"], "Broken");
        assert!(json.get("toNoteId").is_none());
    }

    #[test]
    fn test_failure_edge_id_is_camel_case() {
        let to = Uuid::from_u128(7);
        let failure = LinkFailure {
            kind: LinkFailureKind::Create,
            title: None,
            to_note_id: Some(to),
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "create");
        assert_eq!(json["toNoteId"], to.to_string());
    }
}
