use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One question/answer pair of a completed interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: i64,
    pub question_text: String,
    pub answer: Option<String>,
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
}

impl AnswerRecord {
    /// Written answer if present, otherwise the transcript; blanks count as
    /// missing.
    pub fn response_text(&self) -> Option<&str> {
        [self.answer.as_deref(), self.transcript.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub username: String,
    pub applicant_id: i64,
    pub interview_id: i64,
    pub applicant_name: String,
    pub job_role: String,
    pub answers: Vec<AnswerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_summary: Option<String>,
}

impl SummaryRequest {
    pub fn answered_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| a.response_text().is_some())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub applicant_id: i64,
    pub interview_id: i64,
    pub generated_at: DateTime<Utc>,
    pub overview: String,
    /// Never empty.
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub recommendation: String,
    pub is_placeholder: bool,
}

/// `{ "summary": … }` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEnvelope {
    pub summary: SummaryResponse,
}
