use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: i64,
    pub title: String,
    pub job_role: String,
    pub description: Option<String>,
    pub status: InterviewStatus,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Partial interview record for create/update bodies. Unset fields are
/// omitted from the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterviewDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InterviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Resource for Interview {
    const PATH: &'static str = "interviews";
    type Draft = InterviewDraft;
}
