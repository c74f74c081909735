use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantAnswer {
    pub id: i64,
    pub interview_id: i64,
    pub question_id: i64,
    pub applicant_id: i64,
    pub answer: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnswerDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_id: Option<i64>,
    /// `Some(None)` clears the answer; `None` leaves it untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Resource for ApplicantAnswer {
    const PATH: &'static str = "applicant_answers";
    type Draft = AnswerDraft;
}
