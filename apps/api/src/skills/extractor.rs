//! Skill Extractor: turns raw resume or job text into a canonical `SkillSet`.
//!
//! Extraction never fails from the caller's point of view. `try_extract` reports the
//! tagged reason; `extract_skills` logs it and degrades to an empty set.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{complete_within, parse_fenced_json, CapabilityFailure, TextModel};
use crate::skills::prompts::SKILL_EXTRACTION_PROMPT_TEMPLATE;
use crate::skills::skill_set::SkillSet;

/// Input beyond this many characters is not sent to the model.
pub const MAX_EXTRACTION_CHARS: usize = 3000;

#[derive(Clone)]
pub struct SkillExtractor {
    model: Arc<dyn TextModel>,
    timeout: Duration,
}

impl SkillExtractor {
    pub fn new(model: Arc<dyn TextModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Extracts skills, mapping any failure to an empty set.
    pub async fn extract_skills(&self, text: &str) -> SkillSet {
        match self.try_extract(text).await {
            Ok(skills) => {
                debug!("Extracted {} skills", skills.len());
                skills
            }
            Err(e) => {
                warn!("Skill extraction failed, using empty skill set: {e}");
                SkillSet::new()
            }
        }
    }

    pub async fn try_extract(&self, text: &str) -> Result<SkillSet, CapabilityFailure> {
        let text = truncate_chars(text.trim(), MAX_EXTRACTION_CHARS);
        if text.is_empty() {
            return Ok(SkillSet::new());
        }

        let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE.replace("{text}", text);
        let raw = complete_within(self.model.as_ref(), &prompt, JSON_ONLY_SYSTEM, self.timeout)
            .await?;

        parse_skill_list(&raw)
    }
}

/// Parses a (possibly fenced) JSON array of strings into a `SkillSet`.
pub fn parse_skill_list(raw: &str) -> Result<SkillSet, CapabilityFailure> {
    let labels: Vec<String> =
        parse_fenced_json(raw).map_err(|e| CapabilityFailure::Malformed(e.to_string()))?;
    Ok(labels.into_iter().collect())
}

/// Returns the first `max` characters of `text`, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
