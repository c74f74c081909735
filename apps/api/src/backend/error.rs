//! Backend request error types.

use thiserror::Error;

/// Maximum number of characters of a failed body kept for diagnostics.
pub const SNIPPET_CHARS: usize = 200;

/// Errors produced by the request dispatcher and the clients built on it.
///
/// Failed response bodies are never parsed; callers get the status code and
/// a raw snippet and decide for themselves.
#[derive(Debug, Error)]
pub enum RequestError {
    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}: {snippet}")]
    Status {
        /// HTTP status code returned by the backend.
        status: u16,
        /// First [`SNIPPET_CHARS`] characters of the response body.
        snippet: String,
    },

    /// A success body declared as JSON could not be parsed.
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A configured credential cannot be sent as an HTTP header value.
    #[error("invalid credential: {0}")]
    InvalidCredential(&'static str),

    /// The body decoded fine but not into the shape the caller expected.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl RequestError {
    /// Status code for backend rejections; `None` for transport/decode errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_failed_body(status: u16, body: &str) -> Self {
        RequestError::Status {
            status,
            snippet: snippet(body),
        }
    }
}

/// Char-boundary-safe prefix of `body`.
pub fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}
