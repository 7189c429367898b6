// Cross-cutting prompt fragments. Each module that calls the LLM keeps its own
// prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for short plain-prose answers.
pub const PLAIN_PROSE_SYSTEM: &str = "You are a concise technical recruiter. \
    Respond in plain prose only. \
    Do NOT use markdown, bullet points, or headings.";
