//! Summarization Gateway — picks the live or placeholder branch and
//! produces the canonical response.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use crate::llm_client::LlmClient;
use crate::summary::format::{format_summary, placeholder_result, LiveResult, SummaryDraft};
use crate::summary::generator::{LlmSummaryGenerator, SummaryGenerator};
use crate::summary::models::{SummaryRequest, SummaryResponse};

#[derive(Clone)]
pub struct SummaryGateway {
    generator: Option<Arc<dyn SummaryGenerator>>,
}

impl SummaryGateway {
    /// Live generation iff `genai_api_key` is set; nothing else decides it.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let generator = match &config.genai_api_key {
            Some(key) => {
                let llm = LlmClient::new(key.clone(), config.genai_model.clone())
                    .map_err(|e| GatewayError::ServiceUnavailable(e.to_string()))?;
                info!("Live summaries enabled (model: {})", config.genai_model);
                Some(Arc::new(LlmSummaryGenerator::new(llm)) as Arc<dyn SummaryGenerator>)
            }
            None => {
                info!("GENAI_API_KEY not set; summaries will use the placeholder template");
                None
            }
        };
        Ok(Self { generator })
    }

    pub fn with_generator(generator: Option<Arc<dyn SummaryGenerator>>) -> Self {
        Self { generator }
    }

    pub fn live_generation_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Runs generation for an already validated and authorised request.
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResponse, GatewayError> {
        let draft = match &self.generator {
            Some(generator) => SummaryDraft::Live(LiveResult {
                content: generator.generate(request).await?,
                generated_at: Utc::now(),
            }),
            None => SummaryDraft::Placeholder(placeholder_result(request)),
        };
        Ok(format_summary(request, draft))
    }
}
