//! Link synchronization and backlink endpoints.
//!
//! Mounted under `/links` (and `/api/links`):
//!
//! - `POST /links/updateLinksForNote` reconciles a note's outgoing links
//!   against its current content
//! - `GET /links/backlinks/:noteId` lists the notes that link to a note

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use notelink_core::{parse_id, LinkFailure, NoteSummary, ReconcileSummary};

use crate::error::{ApiError, ErrorBody};
use crate::AppState;

pub const NOTE_ID_REQUIRED: &str = "NoteId is required";
pub const USER_ID_REQUIRED: &str = "UserId is required";
pub const INVALID_NOTE_ID: &str = "Invalid note ID";
pub const INVALID_USER_ID: &str = "Invalid user ID";
pub const UPDATE_FAILED: &str = "Error updating links";
pub const BACKLINKS_FAILED: &str = "Error retrieving backlinks";

/// Body of `POST /links/updateLinksForNote`.
///
/// Ids arrive as strings so that missing and malformed values can be told
/// apart and reported with their own message.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinksRequest {
    pub note_id: Option<String>,
    /// Latest note body; absent or null is treated as empty.
    #[serde(default)]
    pub content: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinksResponse {
    pub message: String,
    pub links_created: usize,
    pub links_deleted: usize,
    pub total_links: usize,
    pub targets_resolved: usize,
    pub stubs_created: usize,
    pub failures: Vec<LinkFailure>,
}

impl From<ReconcileSummary> for UpdateLinksResponse {
    fn from(summary: ReconcileSummary) -> Self {
        Self {
            message: "Links updated successfully".to_string(),
            links_created: summary.links_created,
            links_deleted: summary.links_deleted,
            total_links: summary.total_links,
            targets_resolved: summary.targets_resolved,
            stubs_created: summary.stubs_created,
            failures: summary.failures,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BacklinksResponse {
    pub message: String,
    pub backlinks: Vec<NoteSummary>,
}

/// Parse a required id field, distinguishing absent from malformed.
fn required_id(raw: Option<&str>, missing: &str, malformed: &str) -> Result<Uuid, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(missing.to_string()))?;
    parse_id(raw).map_err(|_| ApiError::BadRequest(malformed.to_string()))
}

/// Reconcile the outgoing links of a note with the references in its content.
#[utoipa::path(post, path = "/links/updateLinksForNote", tag = "Links",
    request_body = UpdateLinksRequest,
    responses(
        (status = 200, description = "Links reconciled", body = UpdateLinksResponse),
        (status = 400, description = "Missing or malformed noteId/userId", body = ErrorBody),
        (status = 404, description = "Note not found or access denied", body = ErrorBody),
        (status = 500, description = "Error updating links", body = ErrorBody),
    )
)]
pub async fn update_links_for_note(
    State(state): State<AppState>,
    payload: Result<Json<UpdateLinksRequest>, JsonRejection>,
) -> Result<Json<UpdateLinksResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let note_id = required_id(req.note_id.as_deref(), NOTE_ID_REQUIRED, INVALID_NOTE_ID)?;
    let owner_id = required_id(req.user_id.as_deref(), USER_ID_REQUIRED, INVALID_USER_ID)?;
    let content = req.content.unwrap_or_default();

    debug!(
        subsystem = "api",
        op = "update_links",
        note_id = %note_id,
        owner_id = %owner_id,
        content_len = content.len(),
        "Updating links for note"
    );

    let summary = state
        .reconciler
        .reconcile(note_id, owner_id, &content)
        .await
        .map_err(|e| ApiError::from(e).or_internal(UPDATE_FAILED))?;

    Ok(Json(summary.into()))
}

/// List the notes whose content references the given note.
#[utoipa::path(get, path = "/links/backlinks/{noteId}", tag = "Links",
    params(("noteId" = String, Path, description = "Target note id")),
    responses(
        (status = 200, description = "Backlinks retrieved", body = BacklinksResponse),
        (status = 400, description = "Invalid note ID", body = ErrorBody),
        (status = 500, description = "Error retrieving backlinks", body = ErrorBody),
    )
)]
pub async fn get_backlinks(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<Json<BacklinksResponse>, ApiError> {
    let note_id = required_id(Some(&note_id), NOTE_ID_REQUIRED, INVALID_NOTE_ID)?;

    let backlinks = state
        .reconciler
        .backlinks(note_id)
        .await
        .map_err(|e| ApiError::from(e).or_internal(BACKLINKS_FAILED))?;

    Ok(Json(BacklinksResponse {
        message: "Backlinks retrieved successfully".to_string(),
        backlinks,
    }))
}
