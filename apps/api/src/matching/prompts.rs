// LLM prompt constants for the matching module.

/// Match explanation prompt template.
/// Replace: {candidate_skills}, {job_skills}, {score}
pub const EXPLANATION_PROMPT_TEMPLATE: &str = r#"Generate a brief explanation for a job match between a candidate and a job.

Candidate skills: {candidate_skills}
Job required skills: {job_skills}
Match score (0-100): {score}

Provide 2-3 sentences explaining the match quality and the candidate's key strengths for this role. Mention the most important missing skills, if any."#;
