//! PostgreSQL pool setup and health logging.
//!
//! Idle timeout and connection lifetime are fixed from
//! [`notelink_core::defaults`]; only the knobs the server and the test
//! fixtures vary are exposed on [`PoolConfig`].

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use notelink_core::defaults::{
    DB_CONNECT_TIMEOUT_SECS, DB_IDLE_TIMEOUT_SECS, DB_MAX_CONNECTIONS, DB_MAX_LIFETIME_SECS,
};
use notelink_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// How long `acquire` waits for a free connection.
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DB_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DB_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(Duration::from_secs(DB_IDLE_TIMEOUT_SECS))
            .max_lifetime(Duration::from_secs(DB_MAX_LIFETIME_SECS))
    }
}

/// Connect a pool to `database_url`.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = config
        .options()
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Database pool connected"
    );
    Ok(pool)
}

/// Log pool size and idle count; warn when every connection is busy.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    debug!(
        subsystem = "db",
        component = "pool",
        op = "metrics",
        pool_size = size,
        pool_idle = idle,
        "Pool health check"
    );

    if idle == 0 && size > 0 {
        warn!(
            subsystem = "db",
            component = "pool",
            pool_size = size,
            "No idle database connections"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = PoolConfig::new()
            .max_connections(5)
            .connect_timeout(Duration::from_secs(3));

        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(PoolConfig::new().max_connections, DB_MAX_CONNECTIONS);
    }

    #[test]
    fn test_options_apply_fixed_timeouts() {
        let options = PoolConfig::new().max_connections(7).options();

        assert_eq!(options.get_max_connections(), 7);
        assert_eq!(
            options.get_idle_timeout(),
            Some(Duration::from_secs(DB_IDLE_TIMEOUT_SECS))
        );
        assert_eq!(
            options.get_max_lifetime(),
            Some(Duration::from_secs(DB_MAX_LIFETIME_SECS))
        );
    }
}
