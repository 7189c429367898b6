// Skills normalization: free text → canonical SkillSet.
// All LLM calls go through llm_client::TextModel.

pub mod extractor;
pub mod prompts;
pub mod skill_set;

pub use extractor::SkillExtractor;
pub use skill_set::SkillSet;
