//! # notelink-api
//!
//! HTTP surface for the notelink link graph.
//!
//! The binary in `main.rs` wires configuration, logging and the database;
//! this library exposes the [`router`] so integration tests can serve it
//! over any [`AppState`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use uuid::Uuid;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

use handlers::{health, links};

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "notelink API",
        description = "Wiki-style link graph: reference sync and backlinks"
    ),
    paths(
        links::update_links_for_note,
        links::get_backlinks,
        health::health_check,
    ),
    components(schemas(
        links::UpdateLinksRequest,
        links::UpdateLinksResponse,
        links::BacklinksResponse,
        health::HealthResponse,
        error::ErrorBody,
        notelink_core::NoteSummary,
        notelink_core::LinkFailure,
        notelink_core::LinkFailureKind,
    )),
    tags(
        (name = "Links", description = "Link synchronization and backlinks"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Routes under `/links`, mounted at the root and under `/api`.
fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/updateLinksForNote", post(links::update_links_for_note))
        .route("/backlinks/:noteId", get(links::get_backlinks))
}

/// Parse configured CORS origins, skipping any that are not valid headers.
fn cors_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

/// Build the full application router with middleware.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/openapi.json", get(openapi_json))
        .nest("/links", link_routes())
        .nest("/api/links", link_routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins(&config.allowed_origins)))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(RequestBodyLimitLayer::new(
            notelink_core::defaults::REQUEST_BODY_LIMIT_BYTES,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_origins_skip_invalid() {
        let origins = cors_origins(&[
            "https://notes.example".to_string(),
            "bad\norigin".to_string(),
        ]);
        assert_eq!(origins, vec![HeaderValue::from_static("https://notes.example")]);
    }

    #[test]
    fn test_openapi_documents_link_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/links/updateLinksForNote"));
        assert!(doc.paths.paths.contains_key("/links/backlinks/{noteId}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
