//! Axum route handlers for the Summarization API.

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::info;

use crate::errors::{FieldError, GatewayError};
use crate::state::AppState;
use crate::summary::auth::AuthenticatedUser;
use crate::summary::models::SummaryEnvelope;
use crate::summary::validation::validate_request;

/// POST /api/summarize-applicant
///
/// Credential → schema validation → identity check → live or placeholder
/// generation. The placeholder branch is a normal 200; only `isPlaceholder`
/// tells it apart.
pub async fn handle_summarize_applicant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Bytes,
) -> Result<Json<SummaryEnvelope>, GatewayError> {
    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        GatewayError::Validation(vec![FieldError::new(
            vec![],
            format!("body is not valid JSON: {e}"),
        )])
    })?;

    let request = validate_request(&value).map_err(GatewayError::Validation)?;

    if request.username != user.username {
        return Err(GatewayError::Forbidden);
    }

    let summary = state.gateway.summarize(&request).await?;

    info!(
        "Summary for applicant {} (interview {}) ready, placeholder={}",
        summary.applicant_id, summary.interview_id, summary.is_placeholder
    );

    Ok(Json(SummaryEnvelope { summary }))
}
