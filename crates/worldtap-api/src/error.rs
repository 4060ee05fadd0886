//! Error types for the state API.
//!
//! [`ApiError`] carries an engine-side failure back to the HTTP layer and
//! converts it into a response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};
use worldtap_core::bridge::BridgeError;

/// Errors that can occur while serving a state document.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The engine could not produce the document.
    #[error("{endpoint}: {source}")]
    Engine {
        /// Path of the endpoint that failed.
        endpoint: &'static str,
        /// The bridge failure.
        source: BridgeError,
    },
}

impl ApiError {
    /// HTTP status this error maps to.
    ///
    /// Failures while projecting are server errors; an engine that is gone
    /// or not answering makes the service unavailable.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Engine { source, .. } => match source {
                BridgeError::Projection { .. } | BridgeError::Panicked { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                BridgeError::EngineStopped | BridgeError::TimedOut { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!(status = status.as_u16(), error = %message, "Engine unavailable");
        } else {
            error!(status = status.as_u16(), error = %message, "Snapshot projection failed");
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
