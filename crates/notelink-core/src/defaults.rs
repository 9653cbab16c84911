//! Centralized default constants for notelink.
//!
//! Every crate references these instead of defining its own magic numbers.
//! Environment overrides are read by the API's `ServerConfig`.

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum accepted request body (note content travels in the body).
pub const REQUEST_BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Default CORS origin when `ALLOWED_ORIGINS` is unset.
pub const ALLOWED_ORIGINS: &str = "http://localhost:5173";

// =============================================================================
// DATABASE
// =============================================================================

/// Default database URL for local development.
pub const DATABASE_URL: &str = "postgres://localhost/notelink";

/// Default maximum number of pooled connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Default pool acquire timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout in seconds.
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default maximum connection lifetime in seconds.
pub const DB_MAX_LIFETIME_SECS: u64 = 1800;

// =============================================================================
// LOGGING
// =============================================================================

/// Default tracing filter when `RUST_LOG` is unset.
pub const LOG_FILTER: &str =
    "notelink_api=debug,notelink_core=debug,notelink_db=debug,tower_http=debug";

/// Default log file name when `LOG_FILE` points at a directory-less path.
pub const LOG_FILE_NAME: &str = "notelink-api.log";
