use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub interview_id: i64,
    pub question: String,
    pub difficulty: Difficulty,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Resource for Question {
    const PATH: &'static str = "questions";
    type Draft = QuestionDraft;
}
