// Cross-cutting prompt fragments shared by every LLM-backed feature.
// Feature-specific prompts live next to the feature (see `summary::prompts`).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps assessments anchored to what the applicant actually said.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every statement only on the answers and transcripts provided. \
    Do NOT infer, interpolate, or invent experience the applicant did not describe. \
    If the material does not support a claim, omit it entirely.";
