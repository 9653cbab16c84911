//! Link repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use notelink_core::{new_v7, Error, Link, LinkRepository, NoteSummary, Result};

use crate::violates_constraint;

/// Unique `(from_note_id, to_note_id)` constraint on `link`.
///
/// Only this constraint maps to [`Error::DuplicateLink`]; every other
/// violation (self reference, foreign key) surfaces as a database error.
pub const LINK_FROM_TO_CONSTRAINT: &str = "link_from_to_unique";

/// PostgreSQL implementation of LinkRepository.
pub struct PgLinkRepository {
    pool: Pool<Postgres>,
}

impl PgLinkRepository {
    /// Create a new PgLinkRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Count edges owned by a user.
    pub async fn count_for_owner(&self, owner_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM link WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("count"))
    }
}

fn link_from_row(row: &PgRow) -> Link {
    Link {
        id: row.get("id"),
        from_note_id: row.get("from_note_id"),
        to_note_id: row.get("to_note_id"),
        owner_id: row.get("owner_id"),
        created_at_utc: row.get("created_at_utc"),
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, from_note_id: Uuid, to_note_id: Uuid, owner_id: Uuid) -> Result<Link> {
        let row = sqlx::query(
            r#"INSERT INTO link (id, from_note_id, to_note_id, owner_id, created_at_utc)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, from_note_id, to_note_id, owner_id, created_at_utc"#,
        )
        .bind(new_v7())
        .bind(from_note_id)
        .bind(to_note_id)
        .bind(owner_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if violates_constraint(&e, LINK_FROM_TO_CONSTRAINT) {
                return Error::DuplicateLink {
                    from_note_id,
                    to_note_id,
                };
            }
            Error::Database(e)
        })?;

        Ok(link_from_row(&row))
    }

    async fn get_outgoing(&self, from_note_id: Uuid, owner_id: Uuid) -> Result<Vec<Link>> {
        let rows = sqlx::query(
            r#"SELECT id, from_note_id, to_note_id, owner_id, created_at_utc
               FROM link
               WHERE from_note_id = $1 AND owner_id = $2"#,
        )
        .bind(from_note_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(link_from_row).collect())
    }

    async fn delete_many(&self, link_ids: &[Uuid]) -> Result<u64> {
        if link_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM link WHERE id = ANY($1)")
            .bind(link_ids)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "link_repo",
            op = "delete_many",
            requested = link_ids.len(),
            links_deleted = result.rows_affected(),
            "Deleted links"
        );
        Ok(result.rows_affected())
    }

    async fn get_backlinks(&self, to_note_id: Uuid) -> Result<Vec<NoteSummary>> {
        // Inner join drops edges whose source note is gone.
        let rows = sqlx::query(
            r#"SELECT n.id, n.title, n.content
               FROM link l
               JOIN note n ON n.id = l.from_note_id
               WHERE l.to_note_id = $1"#,
        )
        .bind(to_note_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| NoteSummary {
                id: row.get("id"),
                title: row.get("title"),
                content: row.get("content"),
            })
            .collect())
    }
}
