//! Shared handler state.

use notelink_core::LinkReconciler;
use notelink_db::Database;

/// State cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: LinkReconciler,
    /// Present when backed by PostgreSQL; probed by the health endpoint.
    pub db: Option<Database>,
}

impl AppState {
    /// State backed by a PostgreSQL database.
    pub fn from_database(db: Database) -> Self {
        Self {
            reconciler: db.reconciler(),
            db: Some(db),
        }
    }

    /// State around an arbitrary reconciler, with no database to probe.
    pub fn with_reconciler(reconciler: LinkReconciler) -> Self {
        Self {
            reconciler,
            db: None,
        }
    }
}
