//! Structured logging schema and field name constants for notelink.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed with a store error, requires operator attention |
//! | WARN  | Recoverable issue: a single edge or title failed, reconciliation continued |
//! | INFO  | Lifecycle events (startup, shutdown), reconciliation completions |
//! | DEBUG | Decision points: swallowed duplicates, skipped deletes, config choices |
//! | TRACE | Per-title and per-edge iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the HTTP request.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "links"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "reconciler", "pool", "link_repo", "note_repo"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "reconcile", "backlinks", "resolve_title"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note UUID being operated on (the link source during reconciliation).
pub const NOTE_ID: &str = "note_id";

/// Owning user UUID.
pub const OWNER_ID: &str = "owner_id";

/// Target note UUID of an edge.
pub const TARGET_ID: &str = "target_id";

/// Referenced title being resolved.
pub const TITLE: &str = "title";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of titles extracted from content.
pub const TITLE_COUNT: &str = "title_count";

/// Number of edges created.
pub const LINKS_CREATED: &str = "links_created";

/// Number of edges deleted.
pub const LINKS_DELETED: &str = "links_deleted";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database constraint named in a violation.
pub const CONSTRAINT: &str = "constraint";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Number of non-fatal failures recorded during an operation.
pub const FAILURE_COUNT: &str = "failure_count";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL_FIELDS: &[&str] = &[
        REQUEST_ID,
        SUBSYSTEM,
        COMPONENT,
        OPERATION,
        NOTE_ID,
        OWNER_ID,
        TARGET_ID,
        TITLE,
        DURATION_MS,
        RESULT_COUNT,
        TITLE_COUNT,
        LINKS_CREATED,
        LINKS_DELETED,
        POOL_SIZE,
        POOL_IDLE,
        CONSTRAINT,
        SUCCESS,
        ERROR_MSG,
        FAILURE_COUNT,
    ];

    #[test]
    fn test_field_names_are_unique() {
        let unique: HashSet<_> = ALL_FIELDS.iter().collect();
        assert_eq!(unique.len(), ALL_FIELDS.len());
    }

    #[test]
    fn test_field_names_are_snake_case() {
        for field in ALL_FIELDS {
            assert!(
                field
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c == '_'),
                "field {:?} is not snake_case",
                field
            );
        }
    }
}
