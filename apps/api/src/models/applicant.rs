use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicantStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: i64,
    pub interview_id: i64,
    pub firstname: String,
    pub surname: String,
    pub phone_number: Option<String>,
    pub email_address: String,
    pub interview_status: ApplicantStatus,
    pub username: String,
}

impl Applicant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.surname)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicantDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_status: Option<ApplicantStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Resource for Applicant {
    const PATH: &'static str = "applicants";
    type Draft = ApplicantDraft;
}
