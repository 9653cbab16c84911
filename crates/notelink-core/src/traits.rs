//! Core traits for notelink abstractions.
//!
//! These traits define the store boundary the reconciler talks to. The
//! PostgreSQL implementations live in `notelink-db`; an in-memory one is
//! available behind the `mock` feature.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for the note lookups and creates the link engine needs.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Create a note. Fails if the owner already has a note with this title.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by id, only if it belongs to `owner_id`.
    async fn fetch_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>>;

    /// Find the owner's note with exactly this title (case-sensitive).
    async fn find_by_title(&self, title: &str, owner_id: Uuid) -> Result<Option<Note>>;

    /// Return the owner's note with this title, creating an empty stub if
    /// none exists.
    ///
    /// Must be idempotent under concurrency: two callers racing on the same
    /// `(title, owner)` resolve to the same note.
    async fn get_or_create_by_title(&self, title: &str, owner_id: Uuid) -> Result<ResolvedNote>;
}

// =============================================================================
// LINK REPOSITORY TRAITS
// =============================================================================

/// Repository for note-to-note edges.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Insert a single edge.
    ///
    /// Returns [`crate::Error::DuplicateLink`] when the `(from, to)` pair
    /// already exists; any other constraint violation is a hard error.
    async fn create(&self, from_note_id: Uuid, to_note_id: Uuid, owner_id: Uuid) -> Result<Link>;

    /// All edges with `from_note_id` as source, scoped to the owner.
    async fn get_outgoing(&self, from_note_id: Uuid, owner_id: Uuid) -> Result<Vec<Link>>;

    /// Delete edges by id in one operation. Returns the number removed.
    async fn delete_many(&self, link_ids: &[Uuid]) -> Result<u64>;

    /// Source notes of all edges pointing at `to_note_id`.
    ///
    /// Edges whose source note no longer exists are skipped.
    async fn get_backlinks(&self, to_note_id: Uuid) -> Result<Vec<NoteSummary>>;
}
