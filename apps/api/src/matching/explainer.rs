//! Match Explainer: a short natural-language rationale for one candidate/job match.
//!
//! Never aborts a recommendation: any failure or timeout yields `FALLBACK_EXPLANATION`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::llm_client::prompts::PLAIN_PROSE_SYSTEM;
use crate::llm_client::{complete_within, CapabilityFailure, TextModel};
use crate::matching::cache::{cache_key, ExplanationCache};
use crate::matching::prompts::EXPLANATION_PROMPT_TEMPLATE;
use crate::skills::SkillSet;

pub const FALLBACK_EXPLANATION: &str = "Match analysis based on skills compatibility.";

#[derive(Clone)]
pub struct MatchExplainer {
    model: Arc<dyn TextModel>,
    timeout: Duration,
    cache: Option<Arc<dyn ExplanationCache>>,
}

impl MatchExplainer {
    pub fn new(model: Arc<dyn TextModel>, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ExplanationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Explains the match, consulting the cache first. Failures fall back to the generic text.
    pub async fn explain(&self, candidate: &SkillSet, job: &SkillSet, score: f64) -> String {
        let key = self.cache.as_ref().map(|_| cache_key(candidate, job, score));

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key).await {
                debug!("Explanation cache hit");
                return hit;
            }
        }

        match self.try_explain(candidate, job, score).await {
            Ok(explanation) => {
                if let (Some(cache), Some(key)) = (&self.cache, &key) {
                    cache.put(key, &explanation).await;
                }
                explanation
            }
            Err(e) => {
                warn!("Match explanation failed, using fallback: {e}");
                FALLBACK_EXPLANATION.to_string()
            }
        }
    }

    pub async fn try_explain(
        &self,
        candidate: &SkillSet,
        job: &SkillSet,
        score: f64,
    ) -> Result<String, CapabilityFailure> {
        let prompt = build_explanation_prompt(candidate, job, score);
        complete_within(self.model.as_ref(), &prompt, PLAIN_PROSE_SYSTEM, self.timeout).await
    }
}

fn build_explanation_prompt(candidate: &SkillSet, job: &SkillSet, score: f64) -> String {
    let list = |s: &SkillSet| {
        if s.is_empty() {
            "(none)".to_string()
        } else {
            s.iter().collect::<Vec<_>>().join(", ")
        }
    };
    EXPLANATION_PROMPT_TEMPLATE
        .replace("{candidate_skills}", &list(candidate))
        .replace("{job_skills}", &list(job))
        .replace("{score}", &format!("{score:.1}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    struct CountingModel {
        answer: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextModel for CountingModel {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .map(str::to_string)
                .ok_or(LlmError::EmptyContent)
        }
    }

    struct Hang;

    #[async_trait]
    impl TextModel for Hang {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct MemoryCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl ExplanationCache for MemoryCache {
        async fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }

        async fn put(&self, key: &str, explanation: &str) {
            self.0
                .lock()
                .unwrap()
                .insert(key.to_string(), explanation.to_string());
        }
    }

    fn model(answer: Option<&'static str>) -> Arc<CountingModel> {
        Arc::new(CountingModel {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    fn set(labels: &[&str]) -> SkillSet {
        labels.iter().collect()
    }

    #[tokio::test]
    async fn test_returns_model_answer() {
        let explainer = MatchExplainer::new(
            model(Some(" Strong Python overlap. Java is missing. ")),
            Duration::from_secs(5),
        );
        let text = explainer
            .explain(&set(&["Python"]), &set(&["Python", "Java"]), 70.9)
            .await;
        assert_eq!(text, "Strong Python overlap. Java is missing.");
    }

    #[tokio::test]
    async fn test_call_failure_returns_literal_fallback() {
        let explainer = MatchExplainer::new(model(None), Duration::from_secs(5));
        let text = explainer
            .explain(&set(&["Python"]), &set(&["Go"]), 0.0)
            .await;
        assert_eq!(text, "Match analysis based on skills compatibility.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_fallback() {
        let explainer = MatchExplainer::new(Arc::new(Hang), Duration::from_secs(3));
        let text = explainer
            .explain(&set(&["Python"]), &set(&["Go"]), 0.0)
            .await;
        assert_eq!(text, FALLBACK_EXPLANATION);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_model() {
        let m = model(Some("Good fit."));
        let cache = Arc::new(MemoryCache::default());
        let explainer =
            MatchExplainer::new(m.clone(), Duration::from_secs(5)).with_cache(cache.clone());

        let c = set(&["Rust"]);
        let j = set(&["Rust", "Go"]);
        assert_eq!(explainer.explain(&c, &j, 55.0).await, "Good fit.");
        assert_eq!(explainer.explain(&c, &j, 55.0).await, "Good fit.");
        assert_eq!(m.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let cache = Arc::new(MemoryCache::default());
        let explainer =
            MatchExplainer::new(model(None), Duration::from_secs(5)).with_cache(cache.clone());
        explainer.explain(&set(&["Rust"]), &set(&["Go"]), 0.0).await;
        assert!(cache.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_prompt_lists_skills_and_score() {
        let prompt = build_explanation_prompt(&set(&["SQL", "Python"]), &SkillSet::new(), 42.06);
        assert!(prompt.contains("Candidate skills: Python, SQL"));
        assert!(prompt.contains("Job required skills: (none)"));
        assert!(prompt.contains("Match score (0-100): 42.1"));
    }
}
