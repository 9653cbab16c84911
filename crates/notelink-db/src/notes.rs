//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use notelink_core::{
    new_v7, CreateNoteRequest, Error, Note, NoteRepository, ResolvedNote, Result,
};

use crate::violates_constraint;

/// Unique `(owner_id, title)` constraint on `note`.
pub const NOTE_OWNER_TITLE_CONSTRAINT: &str = "note_owner_title_unique";

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn note_from_row(row: &PgRow) -> Note {
    Note {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let now = Utc::now();

        let row = sqlx::query(
            r#"INSERT INTO note (id, owner_id, title, content, created_at_utc, updated_at_utc)
               VALUES ($1, $2, $3, $4, $5, $5)
               RETURNING id, owner_id, title, content, created_at_utc, updated_at_utc"#,
        )
        .bind(new_v7())
        .bind(req.owner_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if violates_constraint(&e, NOTE_OWNER_TITLE_CONSTRAINT) {
                return Error::InvalidInput(format!("Note '{}' already exists", req.title));
            }
            Error::Database(e)
        })?;

        Ok(note_from_row(&row))
    }

    async fn fetch_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>> {
        let row = sqlx::query(
            r#"SELECT id, owner_id, title, content, created_at_utc, updated_at_utc
               FROM note
               WHERE id = $1 AND owner_id = $2"#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn find_by_title(&self, title: &str, owner_id: Uuid) -> Result<Option<Note>> {
        let row = sqlx::query(
            r#"SELECT id, owner_id, title, content, created_at_utc, updated_at_utc
               FROM note
               WHERE owner_id = $1 AND title = $2"#,
        )
        .bind(owner_id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn get_or_create_by_title(&self, title: &str, owner_id: Uuid) -> Result<ResolvedNote> {
        let now = Utc::now();

        // The no-op update makes RETURNING yield the existing row on conflict;
        // xmax is 0 only for a freshly inserted tuple.
        let row = sqlx::query(
            r#"INSERT INTO note (id, owner_id, title, content, created_at_utc, updated_at_utc)
               VALUES ($1, $2, $3, '', $4, $4)
               ON CONFLICT ON CONSTRAINT note_owner_title_unique
               DO UPDATE SET title = EXCLUDED.title
               RETURNING id, (xmax = 0) AS created"#,
        )
        .bind(new_v7())
        .bind(owner_id)
        .bind(title)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let resolved = ResolvedNote {
            id: row.get("id"),
            created: row.get("created"),
        };
        if resolved.created {
            debug!(
                subsystem = "db",
                component = "note_repo",
                op = "create_stub",
                note_id = %resolved.id,
                owner_id = %owner_id,
                title = %title,
                "Created stub note for referenced title"
            );
        }
        Ok(resolved)
    }
}
