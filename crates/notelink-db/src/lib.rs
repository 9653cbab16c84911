//! # notelink-db
//!
//! PostgreSQL database layer for notelink.
//!
//! This crate provides:
//! - Connection pool management
//! - Note and link repository implementations
//! - Schema migrations (behind the `migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use notelink_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/notelink").await?;
//!     let reconciler = db.reconciler();
//!
//!     let summary = reconciler.reconcile(note_id, owner_id, "See [[Other Note]]").await?;
//!     println!("created {} links", summary.links_created);
//!     Ok(())
//! }
//! ```
pub mod links;
pub mod notes;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

// Re-export core types
pub use notelink_core::*;

// Re-export repository implementations
pub use links::{PgLinkRepository, LINK_FROM_TO_CONSTRAINT};
pub use notes::{PgNoteRepository, NOTE_OWNER_TITLE_CONSTRAINT};
pub use pool::{create_pool_with_config, log_pool_metrics, PoolConfig};

/// True if `err` is a database error raised by the named constraint.
pub(crate) fn violates_constraint(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(constraint),
        _ => false,
    }
}

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: Pool<Postgres>,
    /// Note repository for lookups and stub creation.
    pub notes: Arc<PgNoteRepository>,
    /// Link repository for note-to-note edges.
    pub links: Arc<PgLinkRepository>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            notes: Arc::new(PgNoteRepository::new(pool.clone())),
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool_with_config(url, PoolConfig::default()).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Round-trip a trivial query to check the pool can serve requests.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    /// A reconciler backed by this database's repositories.
    pub fn reconciler(&self) -> LinkReconciler {
        LinkReconciler::new(self.notes.clone(), self.links.clone())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}
