//! Link-graph synchronization.
//!
//! [`LinkReconciler`] keeps the persisted outgoing edges of a note equal to
//! the `[[Title]]` references in its latest content, creating stub notes for
//! titles that do not exist yet, and answers one-hop backlink queries.
//!
//! ## Failure policy
//!
//! Only the source-note lookup and the load of current edges abort a
//! reconciliation. Every title and every edge is otherwise handled on its
//! own; failures are logged and collected in
//! [`ReconcileSummary::failures`] while the remaining work proceeds. Nothing
//! is rolled back: stubs created before a failure stay, and a later call
//! converges the edge set.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::link_diff::{desired_targets, diff_links};
use crate::models::{LinkFailure, LinkFailureKind, NoteSummary, ReconcileSummary};
use crate::traits::{LinkRepository, NoteRepository};
use crate::wikilinks::extract_wiki_links;

/// Message used for both absent and foreign source notes.
pub const NOTE_NOT_FOUND: &str = "Note not found or access denied";

/// Resolves wiki references and syncs a note's outgoing edges.
#[derive(Clone)]
pub struct LinkReconciler {
    notes: Arc<dyn NoteRepository>,
    links: Arc<dyn LinkRepository>,
}

impl LinkReconciler {
    pub fn new(notes: Arc<dyn NoteRepository>, links: Arc<dyn LinkRepository>) -> Self {
        Self { notes, links }
    }

    /// Make the outgoing edges of `note_id` match the references in `content`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the note does not exist or is not owned by `owner_id`
    /// - any store error from loading the note or its current edges
    pub async fn reconcile(
        &self,
        note_id: Uuid,
        owner_id: Uuid,
        content: &str,
    ) -> Result<ReconcileSummary> {
        let start = Instant::now();

        let source = self
            .notes
            .fetch_owned(note_id, owner_id)
            .await?
            .ok_or_else(|| Error::NotFound(NOTE_NOT_FOUND.to_string()))?;

        let titles = extract_wiki_links(content);
        debug!(
            subsystem = "links",
            component = "reconciler",
            op = "extract",
            note_id = %note_id,
            title_count = titles.len(),
            "Extracted wiki references"
        );

        let mut summary = ReconcileSummary::default();

        let mut resolved = Vec::with_capacity(titles.len());
        let mut unresolved = Vec::new();
        for title in &titles {
            match self.notes.get_or_create_by_title(title, owner_id).await {
                Ok(note) => {
                    trace!(
                        subsystem = "links",
                        component = "reconciler",
                        op = "resolve_title",
                        title = %title,
                        target_id = %note.id,
                        created = note.created,
                        "Resolved title"
                    );
                    summary.targets_resolved += 1;
                    if note.created {
                        summary.stubs_created += 1;
                    }
                    resolved.push(note.id);
                }
                Err(e) => {
                    warn!(
                        subsystem = "links",
                        component = "reconciler",
                        op = "resolve_title",
                        note_id = %note_id,
                        title = %title,
                        error = %e,
                        "Failed to resolve referenced title"
                    );
                    summary.failures.push(LinkFailure {
                        kind: LinkFailureKind::Resolve,
                        title: Some(title.clone()),
                        to_note_id: None,
                        error: e.to_string(),
                    });
                    unresolved.push(title.as_str());
                }
            }
        }

        let desired = desired_targets(source.id, &resolved);
        summary.total_links = desired.len();

        let current = self.links.get_outgoing(source.id, owner_id).await?;
        let current_targets: Vec<Uuid> = current.iter().map(|l| l.to_note_id).collect();
        let diff = diff_links(&current_targets, &desired);

        if !diff.to_remove.is_empty() {
            match self.existing_targets(&unresolved, owner_id).await {
                None => {
                    debug!(
                        subsystem = "links",
                        component = "reconciler",
                        op = "delete_links",
                        note_id = %note_id,
                        skipped = diff.to_remove.len(),
                        "Skipping stale link removal: unresolved titles could not be looked up"
                    );
                }
                Some(protected) => {
                    let stale: HashSet<Uuid> = diff
                        .to_remove
                        .iter()
                        .filter(|id| !protected.contains(id))
                        .copied()
                        .collect();
                    let link_ids: Vec<Uuid> = current
                        .iter()
                        .filter(|l| stale.contains(&l.to_note_id))
                        .map(|l| l.id)
                        .collect();
                    if !link_ids.is_empty() {
                        self.delete_stale(note_id, &link_ids, &mut summary).await;
                    }
                }
            }
        }

        for to_note_id in diff.to_add {
            match self.links.create(source.id, to_note_id, owner_id).await {
                Ok(_) => summary.links_created += 1,
                Err(e) if e.is_duplicate_link() => {
                    debug!(
                        subsystem = "links",
                        component = "reconciler",
                        op = "create_link",
                        note_id = %note_id,
                        target_id = %to_note_id,
                        "Link already exists (concurrent reconcile)"
                    );
                }
                Err(e) => {
                    warn!(
                        subsystem = "links",
                        component = "reconciler",
                        op = "create_link",
                        note_id = %note_id,
                        target_id = %to_note_id,
                        error = %e,
                        "Failed to create link"
                    );
                    summary.failures.push(LinkFailure {
                        kind: LinkFailureKind::Create,
                        title: None,
                        to_note_id: Some(to_note_id),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            subsystem = "links",
            component = "reconciler",
            op = "reconcile",
            note_id = %note_id,
            owner_id = %owner_id,
            links_created = summary.links_created,
            links_deleted = summary.links_deleted,
            total_links = summary.total_links,
            stubs_created = summary.stubs_created,
            failure_count = summary.failures.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Links reconciled"
        );

        Ok(summary)
    }

    async fn delete_stale(
        &self,
        note_id: Uuid,
        link_ids: &[Uuid],
        summary: &mut ReconcileSummary,
    ) {
        match self.links.delete_many(link_ids).await {
            Ok(removed) => summary.links_deleted = removed as usize,
            Err(e) => {
                warn!(
                    subsystem = "links",
                    component = "reconciler",
                    op = "delete_links",
                    note_id = %note_id,
                    error = %e,
                    "Failed to remove stale links"
                );
                summary.failures.push(LinkFailure {
                    kind: LinkFailureKind::Delete,
                    title: None,
                    to_note_id: None,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Ids of existing notes behind titles that failed to resolve.
    ///
    /// An edge to one of these must survive the delete pass even though it
    /// is missing from the desired set. A title with no note cannot have an
    /// edge. Returns `None` when a lookup fails and nothing can be proven
    /// stale.
    async fn existing_targets(&self, titles: &[&str], owner_id: Uuid) -> Option<HashSet<Uuid>> {
        let mut ids = HashSet::new();
        for title in titles {
            match self.notes.find_by_title(title, owner_id).await {
                Ok(Some(note)) => {
                    ids.insert(note.id);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        subsystem = "links",
                        component = "reconciler",
                        op = "lookup_title",
                        title = %title,
                        error = %e,
                        "Failed to look up unresolved title"
                    );
                    return None;
                }
            }
        }
        Some(ids)
    }

    /// Notes whose content references `note_id`.
    ///
    /// An unknown id yields an empty list. Order is unspecified.
    pub async fn backlinks(&self, note_id: Uuid) -> Result<Vec<NoteSummary>> {
        let start = Instant::now();
        let backlinks = self.links.get_backlinks(note_id).await?;
        debug!(
            subsystem = "links",
            component = "reconciler",
            op = "backlinks",
            note_id = %note_id,
            result_count = backlinks.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Backlinks retrieved"
        );
        Ok(backlinks)
    }
}
