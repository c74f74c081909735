//! Turns either generation branch into the canonical `SummaryResponse`.
//!
//! Both branches flow through [`format_summary`], so the output guarantees
//! (non-empty overview, recommendation and strengths) hold for each.

use chrono::{DateTime, SubsecRound, Utc};

use crate::summary::generator::GeneratedContent;
use crate::summary::models::{SummaryRequest, SummaryResponse};

const FALLBACK_OVERVIEW: &str = "The interview was completed; no overview was produced.";
const FALLBACK_RECOMMENDATION: &str =
    "Review the recorded answers before making a hiring decision.";
const FALLBACK_STRENGTH: &str = "Completed the interview process.";

/// Output of a live provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveResult {
    pub content: GeneratedContent,
    pub generated_at: DateTime<Utc>,
}

/// Deterministic template output used when live generation is not configured.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderResult {
    pub overview: String,
    pub strengths: Vec<String>,
    pub recommendation: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryDraft {
    Live(LiveResult),
    Placeholder(PlaceholderResult),
}

/// Builds the placeholder assessment. Same request, same text.
pub fn placeholder_result(request: &SummaryRequest) -> PlaceholderResult {
    let answered = request.answered_count();
    let total = request.answers.len();

    let overview = format!(
        "A live summary could not be produced because AI summarization is not configured \
         on this server (GENAI_API_KEY is not set). {} answered {answered} of {total} \
         question(s) for the {} role.",
        request.applicant_name.trim(),
        request.job_role.trim()
    );

    let recommendation = format!(
        "Review {}'s recorded answers manually. Automated assessments will be available \
         once AI summarization is configured.",
        request.applicant_name.trim()
    );

    let strengths = if answered > 0 {
        vec![format!("Responded to {answered} of {total} interview question(s).")]
    } else {
        Vec::new()
    };

    PlaceholderResult {
        overview,
        strengths,
        recommendation,
        generated_at: Utc::now().trunc_subsecs(0),
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty_or(text: String, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// The single formatting step shared by both branches.
pub fn format_summary(request: &SummaryRequest, draft: SummaryDraft) -> SummaryResponse {
    let (overview, strengths, risks, recommendation, generated_at, is_placeholder) = match draft {
        SummaryDraft::Live(live) => (
            live.content.overview,
            live.content.strengths,
            live.content.risks,
            live.content.recommendation,
            live.generated_at,
            false,
        ),
        SummaryDraft::Placeholder(p) => (
            p.overview,
            p.strengths,
            Vec::new(),
            p.recommendation,
            p.generated_at,
            true,
        ),
    };

    let mut strengths = clean_list(strengths);
    if strengths.is_empty() {
        strengths.push(FALLBACK_STRENGTH.to_string());
    }

    SummaryResponse {
        applicant_id: request.applicant_id,
        interview_id: request.interview_id,
        generated_at,
        overview: non_empty_or(overview, FALLBACK_OVERVIEW),
        strengths,
        risks: clean_list(risks),
        recommendation: non_empty_or(recommendation, FALLBACK_RECOMMENDATION),
        is_placeholder,
    }
}
