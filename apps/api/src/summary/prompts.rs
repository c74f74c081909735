// Prompt constants and prompt composition for applicant summaries.
// Reuses cross-cutting fragments from llm_client::prompts.

use std::fmt::Write as _;

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::summary::models::SummaryRequest;

/// Per-answer cap so one rambling transcript cannot crowd out the rest.
pub const MAX_RESPONSE_CHARS: usize = 4000;

pub const SUMMARY_SYSTEM_ROLE: &str = "You are an experienced technical recruiter \
    writing a short, fair assessment of a completed interview for a hiring manager.";

/// Output contract for the model.
pub const SUMMARY_OUTPUT_SCHEMA: &str = r#"Return a JSON object with this EXACT schema (no extra fields):
{
  "overview": "2-3 sentence overview of how the applicant performed",
  "strengths": ["short strength statement", "..."],
  "risks": ["short risk or gap statement", "..."],
  "recommendation": "one sentence hiring recommendation"
}

Rules:
- "strengths" must contain at least one entry.
- "risks" may be empty when nothing concerning was observed.
- Refer to the applicant by name. Keep each list entry under 25 words."#;

pub fn summary_system_prompt() -> String {
    format!("{SUMMARY_SYSTEM_ROLE} {JSON_ONLY_SYSTEM}")
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max).collect();
    truncated.push_str(" […]");
    truncated
}

/// Builds the user prompt from the applicant's answers, transcripts and
/// optional skills summary.
pub fn build_summary_prompt(request: &SummaryRequest) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "Applicant: {}\nRole: {}\nQuestions answered: {} of {}\n",
        request.applicant_name,
        request.job_role,
        request.answered_count(),
        request.answers.len()
    );

    if let Some(skills) = request
        .skills_summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let _ = writeln!(prompt, "Applicant's skills summary:\n{skills}\n");
    }

    for (i, answer) in request.answers.iter().enumerate() {
        let _ = writeln!(prompt, "Q{}: {}", i + 1, answer.question_text.trim());
        match answer.response_text() {
            Some(text) => {
                let _ = writeln!(prompt, "A{}: {}", i + 1, truncate_chars(text, MAX_RESPONSE_CHARS));
            }
            None => {
                let _ = writeln!(prompt, "A{}: (no answer recorded)", i + 1);
            }
        }
        if let Some(seconds) = answer.duration_seconds {
            let _ = writeln!(prompt, "Time taken: {seconds}s");
        }
        prompt.push('\n');
    }

    let _ = write!(prompt, "{SUMMARY_OUTPUT_SCHEMA}\n\n{GROUNDING_INSTRUCTION}");
    prompt
}
