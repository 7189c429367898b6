// LLM prompt constants for skill extraction.

/// Skill extraction prompt template. Replace `{text}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract technical skills and programming languages from the following text.

Return ONLY a JSON array of strings, for example:
["Python", "PostgreSQL", "Kubernetes"]

Rules:
- One skill per element, using its common short name
- No duplicates
- Return [] if the text contains no technical skills

Text:
{text}"#;
