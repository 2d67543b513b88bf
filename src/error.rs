//! Error types and HTTP error response handling.
//!
//! Two layers live here:
//! - [`RemoteError`]: the single "remote call failed" kind raised by the
//!   payments and identity clients.
//! - [`ActionFailure`]: the sentinel a gateway operation hands back to its
//!   caller after the remote error has been logged.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

/// A remote call failed.
///
/// No distinction is drawn between transient and permanent failures: every
/// variant is final for the invocation that produced it.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Network failure, timeout, or body that could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered with a non-2xx status.
    ///
    /// `body` holds the parsed JSON body when the remote sent one.
    #[error("remote returned {status}")]
    Status {
        status: StatusCode,
        body: Option<Value>,
    },

    /// A 2xx response was missing something the operation needs.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RemoteError {
    /// The response body, when the remote sent a JSON one.
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            RemoteError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Log this failure for `operation`: the response body when present, else the error itself.
    pub fn log(&self, operation: &str) {
        match self.response_body() {
            Some(body) => tracing::error!(operation, response = %body, "{operation} failed"),
            None => tracing::error!(operation, error = %self, "{operation} failed"),
        }
    }
}

/// Failure sentinel returned by a gateway operation.
///
/// Each operation picks exactly one of these; callers cannot recover the
/// underlying cause, which only appears in logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionFailure {
    /// The caller sees `null`.
    #[error("operation failed")]
    Null,

    /// The caller sees `{"error": message}`.
    #[error("{0}")]
    Reported(String),

    /// The caller sees nothing at all.
    #[error("operation failed silently")]
    Silent,
}

/// Result of a gateway operation.
pub type ActionResult<T> = Result<T, ActionFailure>;

/// Convert ActionFailure into an HTTP response.
///
/// # Status Code Mapping
///
/// - `Null` → 502 Bad Gateway, body `null`
/// - `Reported` → 401 Unauthorized, body `{"error": message}`
/// - `Silent` → 204 No Content, empty body
impl IntoResponse for ActionFailure {
    fn into_response(self) -> Response {
        match self {
            ActionFailure::Null => (StatusCode::BAD_GATEWAY, Json(Value::Null)).into_response(),
            ActionFailure::Reported(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            ActionFailure::Silent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}
