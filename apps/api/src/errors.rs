use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Stable, machine-readable error codes of the summarization gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    Unauthenticated,
    Forbidden,
    RateLimited,
    GenaiUpstream,
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::GenaiUpstream => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// One step of a field path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single field-level validation failure. Safe to show next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl FieldError {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

/// Wire shape of `{ "error": … }` bodies. `message` is always safe to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Gateway error type.
/// Implements `IntoResponse` so handlers can return `Result<T, GatewayError>`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Validation failed ({} issue(s))", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Generation provider rate limited the request")]
    RateLimited,

    #[error("Generation provider error: {0}")]
    Upstream(String),

    #[error("Generation service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Validation(_) => ErrorCode::ValidationError,
            GatewayError::Unauthenticated(_) => ErrorCode::Unauthenticated,
            GatewayError::Forbidden => ErrorCode::Forbidden,
            GatewayError::RateLimited => ErrorCode::RateLimited,
            GatewayError::Upstream(_) => ErrorCode::GenaiUpstream,
            GatewayError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }

    /// Builds the caller-facing envelope. Provider details never reach it.
    pub fn envelope(&self) -> ErrorEnvelope {
        let (message, details) = match self {
            GatewayError::Validation(details) => (
                "The summary request is invalid".to_string(),
                Some(details.clone()),
            ),
            GatewayError::Unauthenticated(reason) => (reason.clone(), None),
            GatewayError::Forbidden => (
                "You may only request summaries for your own account".to_string(),
                None,
            ),
            GatewayError::RateLimited => (
                "The summary service is busy. Please try again shortly".to_string(),
                None,
            ),
            GatewayError::Upstream(_) => (
                "The summary could not be generated".to_string(),
                None,
            ),
            GatewayError::ServiceUnavailable(_) => (
                "The summary service is currently unavailable".to_string(),
                None,
            ),
        };

        ErrorEnvelope {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            GatewayError::Upstream(msg) => tracing::error!("Generation provider error: {msg}"),
            GatewayError::ServiceUnavailable(msg) => {
                tracing::error!("Generation service unavailable: {msg}")
            }
            GatewayError::RateLimited => tracing::warn!("Generation provider rate limited"),
            _ => {}
        }

        let status = self.code().status();
        let body = Json(json!({ "error": self.envelope() }));

        (status, body).into_response()
    }
}
