// Summarization Gateway: validates summary requests, checks the caller's
// identity, and answers with a live or placeholder assessment.
// All provider calls go through llm_client.

pub mod auth;
pub mod client;
pub mod format;
pub mod gateway;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod validation;

pub use gateway::SummaryGateway;
pub use generator::{GeneratedContent, SummaryGenerator};
pub use models::{AnswerRecord, SummaryEnvelope, SummaryRequest, SummaryResponse};
