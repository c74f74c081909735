//! Caller-side transport for the summarization endpoint.
//!
//! Goes through the same [`Dispatcher`] as backend calls, pointed at the
//! gateway's origin, so the identity merge and header policy are shared.

use crate::backend::{DispatchOptions, Dispatcher, RequestError};
use crate::errors::ErrorEnvelope;
use crate::summary::models::{SummaryEnvelope, SummaryRequest, SummaryResponse};

pub const SUMMARIZE_PATH: &str = "api/summarize-applicant";

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: ErrorEnvelope,
}

pub async fn request_summary(
    dispatcher: &Dispatcher,
    request: &SummaryRequest,
) -> Result<SummaryResponse, RequestError> {
    let body = serde_json::to_value(request)?;
    let envelope: SummaryEnvelope = dispatcher
        .dispatch_json(SUMMARIZE_PATH, DispatchOptions::post(body))
        .await?;
    Ok(envelope.summary)
}

/// Best-effort read of the gateway's `{error}` body from a failed call.
/// `None` when the snippet was truncated or is not an envelope.
pub fn error_envelope(err: &RequestError) -> Option<ErrorEnvelope> {
    match err {
        RequestError::Status { snippet, .. } => serde_json::from_str::<ErrorBody>(snippet)
            .ok()
            .map(|b| b.error),
        _ => None,
    }
}
