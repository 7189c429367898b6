// Matching pipeline: similarity scoring, match explanation, recommendation ranking.
// All LLM calls go through llm_client::TextModel.

pub mod cache;
pub mod explainer;
pub mod handlers;
pub mod prompts;
pub mod ranker;
pub mod scorer;

pub use explainer::MatchExplainer;
pub use ranker::{MatchResult, Recommender, RecommenderConfig};
pub use scorer::TfIdfScorer;
