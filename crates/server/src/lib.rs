//! Property chat server
//!
//! Provides the HTTP endpoints for the chat service.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::init_metrics;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Body returned for any failed request other than a client error
const GENERIC_ERROR: &str = "Something went wrong while processing your request";

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<propchat_core::Error> for ServerError {
    fn from(err: propchat_core::Error) -> Self {
        match err {
            propchat_core::Error::InvalidInput(message) => ServerError::InvalidRequest(message),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<ServerError> for propchat_core::Error {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(message) => propchat_core::Error::InvalidInput(message),
            ServerError::Internal(message) => propchat_core::Error::Internal(message),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::InvalidRequest(message) => message.clone(),
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                GENERIC_ERROR.to_string()
            }
        };

        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ServerError = propchat_core::Error::InvalidInput("message must not be empty".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ServerError = propchat_core::Error::Llm("HTTP 500".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
