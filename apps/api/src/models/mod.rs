//! Backend records. The core holds these only for the lifetime of a call.

pub mod answer;
pub mod applicant;
pub mod interview;
pub mod question;

pub use answer::{AnswerDraft, ApplicantAnswer};
pub use applicant::{Applicant, ApplicantDraft, ApplicantStatus};
pub use interview::{Interview, InterviewDraft, InterviewStatus};
pub use question::{Difficulty, Question, QuestionDraft};

use serde::{de::DeserializeOwned, Serialize};

/// A backend table with a row type and a partial-record type used for
/// create and update bodies.
pub trait Resource: DeserializeOwned + Send {
    /// Route relative to the backend REST root.
    const PATH: &'static str;
    type Draft: Serialize + Send + Sync;
}
