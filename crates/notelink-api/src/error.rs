//! HTTP error mapping.
//!
//! Every error response has the body `{ "message": "..." }`. Server-side
//! failures carry a fixed public message chosen by the handler; the
//! underlying error is logged at ERROR and never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// `message` is returned to the client; `detail` is only logged.
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, detail: impl ToString) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    /// Replace the public message of a server-side failure.
    ///
    /// Client errors keep their own message.
    pub fn or_internal(self, message: &str) -> Self {
        match self {
            ApiError::Internal { detail, .. } => ApiError::internal(message, detail),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<notelink_core::Error> for ApiError {
    fn from(err: notelink_core::Error) -> Self {
        use notelink_core::Error;

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            // Link handlers parse ids themselves to pick the field-specific
            // message; this covers ids rejected deeper in the stack.
            err @ Error::InvalidId(_) => ApiError::BadRequest(err.to_string()),
            // Includes DuplicateLink, which the reconciler absorbs.
            other => ApiError::internal("Internal server error", other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal { message, detail } => {
                error!(
                    subsystem = "api",
                    status = status.as_u16(),
                    error = %detail,
                    "{}",
                    message
                );
                message
            }
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg,
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_core_error_status_mapping() {
        use notelink_core::Error;

        let cases = [
            (Error::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (Error::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (Error::InvalidId("xyz".into()), StatusCode::BAD_REQUEST),
            (
                Error::DuplicateLink {
                    from_note_id: Uuid::nil(),
                    to_note_id: Uuid::nil(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::Config("port".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_or_internal_only_rewrites_server_errors() {
        let err = ApiError::from(notelink_core::Error::Internal("pool closed".into()))
            .or_internal("Error updating links");
        match err {
            ApiError::Internal { message, detail } => {
                assert_eq!(message, "Error updating links");
                assert!(detail.contains("pool closed"));
            }
            other => panic!("expected Internal, got {:?}", other),
        }

        let not_found = ApiError::NotFound("Note not found or access denied".into())
            .or_internal("Error updating links");
        assert_eq!(not_found.to_string(), "Note not found or access denied");
    }

    #[test]
    fn test_internal_response_hides_detail() {
        let response = ApiError::internal("Error retrieving backlinks", "connection refused")
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
