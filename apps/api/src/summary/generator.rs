//! Live summary generation — pluggable, trait-based.
//!
//! Default: `LlmSummaryGenerator` (provider call through `LlmClient`).
//! The gateway holds an `Option<Arc<dyn SummaryGenerator>>`; `None` means no
//! live-generation credential is configured.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::errors::GatewayError;
use crate::llm_client::{LlmClient, LlmError};
use crate::summary::models::SummaryRequest;
use crate::summary::prompts::{build_summary_prompt, summary_system_prompt};

/// Assessment content as produced by a live generator, before formatting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneratedContent {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

impl GeneratedContent {
    /// True when the reply carries no overview, recommendation or strength.
    pub fn is_blank(&self) -> bool {
        self.overview.trim().is_empty()
            && self.recommendation.trim().is_empty()
            && self.strengths.iter().all(|s| s.trim().is_empty())
    }
}

/// Implement this to swap the generation backend without touching the
/// handler. Errors must already be mapped into the gateway taxonomy.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, request: &SummaryRequest) -> Result<GeneratedContent, GatewayError>;
}

/// Maps provider failures onto the gateway's fixed codes.
pub fn map_llm_error(err: LlmError) -> GatewayError {
    match err {
        LlmError::RateLimited { .. } => GatewayError::RateLimited,
        LlmError::Api { status: 429, .. } => GatewayError::RateLimited,
        ref e if e.is_unreachable() => GatewayError::ServiceUnavailable(e.to_string()),
        other => GatewayError::Upstream(other.to_string()),
    }
}

pub struct LlmSummaryGenerator {
    llm: LlmClient,
}

impl LlmSummaryGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SummaryGenerator for LlmSummaryGenerator {
    async fn generate(&self, request: &SummaryRequest) -> Result<GeneratedContent, GatewayError> {
        let prompt = build_summary_prompt(request);
        let system = summary_system_prompt();

        let content: GeneratedContent = self
            .llm
            .call_json(&prompt, &system)
            .await
            .map_err(map_llm_error)?;

        if content.is_blank() {
            return Err(GatewayError::Upstream(
                "model reply had no overview, recommendation or strengths".to_string(),
            ));
        }

        info!(
            "Live summary generated for applicant {} (model: {})",
            request.applicant_id,
            self.llm.model()
        );
        Ok(content)
    }
}
