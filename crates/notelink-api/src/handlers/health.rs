//! Liveness and database health.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    pub version: String,
    /// Database probe result; absent when the server has no database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

#[utoipa::path(get, path = "/health", tag = "System",
    responses(
        (status = 200, description = "Server and database are healthy", body = HealthResponse),
        (status = 503, description = "Database did not answer", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = match &state.db {
        None => None,
        Some(db) => match db.ping().await {
            Ok(()) => {
                notelink_db::log_pool_metrics(db.pool());
                Some(true)
            }
            Err(e) => {
                warn!(subsystem = "api", op = "health", error = %e, "Database ping failed");
                Some(false)
            }
        },
    };

    let degraded = reachable == Some(false);
    let body = HealthResponse {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: reachable.map(|ok| if ok { "ok" } else { "unreachable" }.to_string()),
    };
    let status = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(body))
}
