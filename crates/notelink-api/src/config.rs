//! Server configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | [`defaults::DATABASE_URL`] |
//! | `HOST` | [`defaults::SERVER_HOST`] |
//! | `PORT` | [`defaults::SERVER_PORT`] |
//! | `DB_MAX_CONNECTIONS` | [`defaults::DB_MAX_CONNECTIONS`] |
//! | `REQUEST_TIMEOUT_SECS` | [`defaults::REQUEST_TIMEOUT_SECS`] |
//! | `ALLOWED_ORIGINS` | [`defaults::ALLOWED_ORIGINS`] (comma-separated) |
//! | `RUN_MIGRATIONS` | `true` |
//!
//! Unparseable values fall back to the default with a warning rather than
//! refusing to start.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use notelink_core::{defaults, Error, Result};
use notelink_db::PoolConfig;
use tracing::warn;

/// Runtime settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub request_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            db_max_connections: defaults::DB_MAX_CONNECTIONS,
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
            allowed_origins: split_origins(defaults::ALLOWED_ORIGINS),
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) if !raw.trim().is_empty() => split_origins(&raw),
            _ => base.allowed_origins,
        };

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(base.database_url),
            host: lookup("HOST").unwrap_or(base.host),
            port: parse_or(&lookup, "PORT", base.port),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", base.db_max_connections),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults::REQUEST_TIMEOUT_SECS,
            )),
            allowed_origins,
            run_migrations: lookup("RUN_MIGRATIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(base.run_migrations),
        }
    }

    /// Address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                Error::Config(format!(
                    "invalid bind address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    /// Pool settings derived from this configuration.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new().max_connections(self.db_max_connections)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(
                    subsystem = "config",
                    key = key,
                    value = %raw,
                    fallback = %default,
                    "Unparseable configuration value, using default"
                );
                default
            }
        },
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
