//! In-memory note and link store for testing.
//!
//! `MemoryStore` implements both [`NoteRepository`] and [`LinkRepository`]
//! with the same uniqueness rules as the PostgreSQL schema, plus failure
//! injection so tests can exercise the reconciler's partial-failure paths
//! without a database.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::{LinkRepository, NoteRepository};
use crate::uuid_utils::new_v7;

#[derive(Default)]
struct State {
    notes: HashMap<Uuid, Note>,
    links: Vec<Link>,
}

#[derive(Default)]
struct Faults {
    /// Titles whose resolution fails.
    titles: HashSet<String>,
    /// Titles whose read-only lookup fails.
    lookups: HashSet<String>,
    /// Targets whose edge insert fails with a store error.
    link_targets: HashSet<Uuid>,
    /// Targets whose edge is inserted by a "concurrent" writer right before ours.
    raced_targets: HashSet<Uuid>,
    fail_deletes: bool,
    /// Note lookups and edge queries fail.
    fail_reads: bool,
}

/// In-memory implementation of the note and link repositories.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    faults: Mutex<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `get_or_create_by_title` fail for this title.
    pub async fn fail_title(&self, title: &str) {
        self.faults.lock().await.titles.insert(title.to_string());
    }

    /// Make `find_by_title` fail for this title.
    pub async fn fail_lookup(&self, title: &str) {
        self.faults.lock().await.lookups.insert(title.to_string());
    }

    /// Make edge creation toward `to_note_id` fail with a store error.
    pub async fn fail_link_to(&self, to_note_id: Uuid) {
        self.faults.lock().await.link_targets.insert(to_note_id);
    }

    /// Simulate a concurrent reconciler inserting the edge toward
    /// `to_note_id` first, so our insert hits the unique constraint.
    pub async fn race_link_to(&self, to_note_id: Uuid) {
        self.faults.lock().await.raced_targets.insert(to_note_id);
    }

    /// Make bulk deletes fail.
    pub async fn fail_deletes(&self) {
        self.faults.lock().await.fail_deletes = true;
    }

    /// Make `fetch_owned`, `get_outgoing` and `get_backlinks` fail,
    /// as if the store were unreachable.
    pub async fn fail_reads(&self) {
        self.faults.lock().await.fail_reads = true;
    }

    async fn check_reads(&self) -> Result<()> {
        if self.faults.lock().await.fail_reads {
            return Err(Error::Internal("injected read failure".to_string()));
        }
        Ok(())
    }

    /// Remove a note without touching its edges, leaving them dangling.
    pub async fn remove_note(&self, id: Uuid) -> Option<Note> {
        self.state.lock().await.notes.remove(&id)
    }

    /// Targets of all edges leaving `from_note_id`, regardless of owner.
    pub async fn outgoing_targets(&self, from_note_id: Uuid) -> HashSet<Uuid> {
        self.state
            .lock()
            .await
            .links
            .iter()
            .filter(|l| l.from_note_id == from_note_id)
            .map(|l| l.to_note_id)
            .collect()
    }

    /// Total number of stored edges.
    pub async fn link_count(&self) -> usize {
        self.state.lock().await.links.len()
    }

    /// Total number of stored notes.
    pub async fn note_count(&self) -> usize {
        self.state.lock().await.notes.len()
    }

    fn new_note(owner_id: Uuid, title: &str, content: &str) -> Note {
        let now = Utc::now();
        Note {
            id: new_v7(),
            owner_id,
            title: title.to_string(),
            content: content.to_string(),
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    fn new_link(from_note_id: Uuid, to_note_id: Uuid, owner_id: Uuid) -> Link {
        Link {
            id: new_v7(),
            from_note_id,
            to_note_id,
            owner_id,
            created_at_utc: Utc::now(),
        }
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let mut state = self.state.lock().await;
        let taken = state
            .notes
            .values()
            .any(|n| n.owner_id == req.owner_id && n.title == req.title);
        if taken {
            return Err(Error::InvalidInput(format!(
                "Note '{}' already exists",
                req.title
            )));
        }
        let note = Self::new_note(req.owner_id, &req.title, &req.content);
        state.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn fetch_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>> {
        self.check_reads().await?;
        let state = self.state.lock().await;
        Ok(state
            .notes
            .get(&id)
            .filter(|n| n.owner_id == owner_id)
            .cloned())
    }

    async fn find_by_title(&self, title: &str, owner_id: Uuid) -> Result<Option<Note>> {
        if self.faults.lock().await.lookups.contains(title) {
            return Err(Error::Internal(format!("injected failure looking up '{}'", title)));
        }
        let state = self.state.lock().await;
        Ok(state
            .notes
            .values()
            .find(|n| n.owner_id == owner_id && n.title == title)
            .cloned())
    }

    async fn get_or_create_by_title(&self, title: &str, owner_id: Uuid) -> Result<ResolvedNote> {
        if self.faults.lock().await.titles.contains(title) {
            return Err(Error::Internal(format!("injected failure resolving '{}'", title)));
        }

        // Single lock for lookup and insert, so concurrent callers converge.
        let mut state = self.state.lock().await;
        if let Some(existing) = state
            .notes
            .values()
            .find(|n| n.owner_id == owner_id && n.title == title)
        {
            return Ok(ResolvedNote {
                id: existing.id,
                created: false,
            });
        }
        let note = Self::new_note(owner_id, title, "");
        let id = note.id;
        state.notes.insert(id, note);
        Ok(ResolvedNote { id, created: true })
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, from_note_id: Uuid, to_note_id: Uuid, owner_id: Uuid) -> Result<Link> {
        let (fail, raced) = {
            let faults = self.faults.lock().await;
            (
                faults.link_targets.contains(&to_note_id),
                faults.raced_targets.contains(&to_note_id),
            )
        };
        if fail {
            return Err(Error::Internal(format!(
                "injected failure linking to {}",
                to_note_id
            )));
        }
        if from_note_id == to_note_id {
            return Err(Error::Internal(
                "violates check constraint link_no_self_reference".to_string(),
            ));
        }

        let mut state = self.state.lock().await;
        if raced {
            state
                .links
                .push(Self::new_link(from_note_id, to_note_id, owner_id));
        }
        let exists = state
            .links
            .iter()
            .any(|l| l.from_note_id == from_note_id && l.to_note_id == to_note_id);
        if exists {
            return Err(Error::DuplicateLink {
                from_note_id,
                to_note_id,
            });
        }
        let link = Self::new_link(from_note_id, to_note_id, owner_id);
        state.links.push(link.clone());
        Ok(link)
    }

    async fn get_outgoing(&self, from_note_id: Uuid, owner_id: Uuid) -> Result<Vec<Link>> {
        self.check_reads().await?;
        let state = self.state.lock().await;
        Ok(state
            .links
            .iter()
            .filter(|l| l.from_note_id == from_note_id && l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete_many(&self, link_ids: &[Uuid]) -> Result<u64> {
        if self.faults.lock().await.fail_deletes {
            return Err(Error::Internal("injected delete failure".to_string()));
        }
        let ids: HashSet<&Uuid> = link_ids.iter().collect();
        let mut state = self.state.lock().await;
        let before = state.links.len();
        state.links.retain(|l| !ids.contains(&l.id));
        Ok((before - state.links.len()) as u64)
    }

    async fn get_backlinks(&self, to_note_id: Uuid) -> Result<Vec<NoteSummary>> {
        self.check_reads().await?;
        let state = self.state.lock().await;
        Ok(state
            .links
            .iter()
            .filter(|l| l.to_note_id == to_note_id)
            .filter_map(|l| state.notes.get(&l.from_note_id))
            .map(NoteSummary::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_rejects_duplicate_title_per_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store
            .insert(CreateNoteRequest::stub(owner, "Title"))
            .await
            .unwrap();
        let err = store
            .insert(CreateNoteRequest::stub(owner, "Title"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // Another owner may reuse the title.
        store
            .insert(CreateNoteRequest::stub(Uuid::new_v4(), "Title"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let first = store.get_or_create_by_title("Page", owner).await.unwrap();
        let second = store.get_or_create_by_title("Page", owner).await.unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.note_count().await, 1);
    }

    #[tokio::test]
    async fn test_fetch_owned_hides_foreign_notes() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let note = store
            .insert(CreateNoteRequest::stub(owner, "Mine"))
            .await
            .unwrap();
        assert!(store.fetch_owned(note.id, owner).await.unwrap().is_some());
        assert!(store
            .fetch_owned(note.id, Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_link_is_reported() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.create(a, b, owner).await.unwrap();
        let err = store.create(a, b, owner).await.unwrap_err();
        assert!(err.is_duplicate_link());
        assert_eq!(store.link_count().await, 1);
    }

    #[tokio::test]
    async fn test_backlinks_skip_dangling_sources() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let a = store.insert(CreateNoteRequest::stub(owner, "A")).await.unwrap();
        let b = store.insert(CreateNoteRequest::stub(owner, "B")).await.unwrap();
        let c = store.insert(CreateNoteRequest::stub(owner, "C")).await.unwrap();
        store.create(a.id, c.id, owner).await.unwrap();
        store.create(b.id, c.id, owner).await.unwrap();

        store.remove_note(b.id).await;

        let backlinks = store.get_backlinks(c.id).await.unwrap();
        assert_eq!(backlinks.len(), 1);
        assert_eq!(backlinks[0].id, a.id);
    }
}
