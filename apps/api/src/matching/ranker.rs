//! Recommendation Ranker: scores one candidate against every job and returns the
//! top matches, each with its matching/missing skills and an explanation.
//!
//! Flow: get candidate → list jobs → score all → sort → truncate → explain survivors.
//!
//! Explanations are generated concurrently (bounded by `explain_concurrency`), each
//! under the explainer's own timeout. An explanation depends only on the two skill
//! sets and the score, so explaining just the kept results gives the same list as
//! explaining every job.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::explainer::MatchExplainer;
use crate::matching::scorer::SimilarityScorer;
use crate::models::job::JobRow;
use crate::skills::SkillSet;
use crate::store::{CandidateStore, JobStore};

/// Hard cap on results per request, whatever the configured limit.
pub const MAX_RECOMMENDATIONS: usize = 10;
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = MAX_RECOMMENDATIONS;
pub const DEFAULT_EXPLAIN_CONCURRENCY: usize = 4;

/// One ranked job for a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: i64,
    pub job_title: String,
    pub company: String,
    pub location: String,
    /// 0 – 100, one decimal place
    pub match_score: f64,
    /// job ∩ candidate
    pub matching_skills: SkillSet,
    /// job − candidate
    pub missing_skills: SkillSet,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RecommenderConfig {
    pub limit: usize,
    pub explain_concurrency: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RECOMMENDATION_LIMIT,
            explain_concurrency: DEFAULT_EXPLAIN_CONCURRENCY,
        }
    }
}

/// A job scored but not yet explained.
struct ScoredJob {
    job: JobRow,
    job_skills: SkillSet,
    score: f64,
    matching: SkillSet,
    missing: SkillSet,
}

impl ScoredJob {
    fn into_result(self, explanation: String) -> MatchResult {
        MatchResult {
            job_id: self.job.id,
            job_title: self.job.title,
            company: self.job.company,
            location: self.job.location,
            match_score: self.score,
            matching_skills: self.matching,
            missing_skills: self.missing,
            explanation,
        }
    }
}

pub struct Recommender {
    candidates: Arc<dyn CandidateStore>,
    jobs: Arc<dyn JobStore>,
    scorer: Arc<dyn SimilarityScorer>,
    explainer: MatchExplainer,
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new(
        candidates: Arc<dyn CandidateStore>,
        jobs: Arc<dyn JobStore>,
        scorer: Arc<dyn SimilarityScorer>,
        explainer: MatchExplainer,
        config: RecommenderConfig,
    ) -> Self {
        Self {
            candidates,
            jobs,
            scorer,
            explainer,
            config,
        }
    }

    /// Returns at most `config.limit` matches (never more than `MAX_RECOMMENDATIONS`),
    /// best first, ties by job id ascending.
    /// Fails with `AppError::NotFound` when the candidate does not exist.
    pub async fn recommend(&self, candidate_id: i64) -> Result<Vec<MatchResult>, AppError> {
        let candidate = self
            .candidates
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        let candidate_skills = candidate.skill_set();

        let jobs = self.jobs.list_jobs().await?;
        let total = jobs.len();

        let mut scored: Vec<ScoredJob> = jobs
            .into_iter()
            .map(|job| self.score_job(&candidate_skills, job))
            .collect();
        rank(&mut scored);
        scored.truncate(self.config.limit.clamp(1, MAX_RECOMMENDATIONS));

        let candidate_skills = &candidate_skills;
        let explainer = &self.explainer;
        let results: Vec<MatchResult> = stream::iter(scored.into_iter().map(|s| async move {
            let explanation = explainer
                .explain(candidate_skills, &s.job_skills, s.score)
                .await;
            s.into_result(explanation)
        }))
        .buffered(self.config.explain_concurrency.max(1))
        .collect()
        .await;

        info!(
            "Ranked {} jobs for candidate {}, returning {}",
            total,
            candidate_id,
            results.len()
        );

        Ok(results)
    }

    fn score_job(&self, candidate_skills: &SkillSet, job: JobRow) -> ScoredJob {
        let job_skills = job.skill_set();
        let score = round_score(self.scorer.score(candidate_skills, &job_skills));
        let matching = job_skills.intersection(candidate_skills);
        let missing = job_skills.difference(candidate_skills);
        ScoredJob {
            job,
            job_skills,
            score,
            matching,
            missing,
        }
    }
}

/// Score descending, then job id ascending.
fn rank(scored: &mut [ScoredJob]) {
    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.job.id.cmp(&b.job.id))
    });
}

fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::llm_client::{LlmError, TextModel};
    use crate::matching::explainer::FALLBACK_EXPLANATION;
    use crate::matching::scorer::TfIdfScorer;
    use crate::models::candidate::CandidateRow;

    // ────────────────────────────────────────────────────────────────────────
    // Fixtures
    // ────────────────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct MemoryStore {
        candidates: HashMap<i64, CandidateRow>,
        jobs: Vec<JobRow>,
        job_lists: AtomicUsize,
    }

    #[async_trait]
    impl CandidateStore for MemoryStore {
        async fn get_candidate(&self, id: i64) -> Result<Option<CandidateRow>, AppError> {
            Ok(self.candidates.get(&id).cloned())
        }
    }

    #[async_trait]
    impl JobStore for MemoryStore {
        async fn list_jobs(&self) -> Result<Vec<JobRow>, AppError> {
            self.job_lists.fetch_add(1, Ordering::SeqCst);
            Ok(self.jobs.clone())
        }
    }

    /// Echoes a fixed explanation, optionally failing, and tracks peak concurrency.
    #[derive(Default)]
    struct ScriptedModel {
        fail: bool,
        delay: Option<Duration>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail {
                Err(LlmError::EmptyContent)
            } else {
                Ok("Solid overlap on core skills.".to_string())
            }
        }
    }

    fn job(id: i64, skills: &[&str]) -> JobRow {
        JobRow {
            id,
            title: format!("Job {id}"),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            requirements: String::new(),
            posted_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn candidate(id: i64, skills: &[&str]) -> CandidateRow {
        CandidateRow {
            id,
            name: "Candidate".to_string(),
            email: "candidate@example.com".to_string(),
            resume_text: String::new(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            resume_s3_key: None,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn store(candidates: Vec<CandidateRow>, jobs: Vec<JobRow>) -> Arc<MemoryStore> {
        Arc::new(MemoryStore {
            candidates: candidates.into_iter().map(|c| (c.id, c)).collect(),
            jobs,
            job_lists: AtomicUsize::new(0),
        })
    }

    fn recommender(
        store: Arc<MemoryStore>,
        model: Arc<ScriptedModel>,
        config: RecommenderConfig,
    ) -> Recommender {
        Recommender::new(
            store.clone(),
            store,
            Arc::new(TfIdfScorer),
            MatchExplainer::new(model, Duration::from_secs(5)),
            config,
        )
    }

    fn set(labels: &[&str]) -> SkillSet {
        labels.iter().collect()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Tests
    // ────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_scenario_partial_match_ranks_above_disjoint() {
        let store = store(
            vec![candidate(1, &["Python", "SQL"])],
            vec![job(2, &["Go", "Rust"]), job(1, &["Python", "SQL", "Java"])],
        );
        let r = recommender(store, Arc::default(), RecommenderConfig::default());

        let results = r.recommend(1).await.unwrap();
        assert_eq!(results.len(), 2);

        let a = &results[0];
        assert_eq!(a.job_id, 1);
        assert_eq!(a.matching_skills, set(&["Python", "SQL"]));
        assert_eq!(a.missing_skills, set(&["Java"]));
        assert_eq!(a.explanation, "Solid overlap on core skills.");

        let b = &results[1];
        assert_eq!(b.job_id, 2);
        assert!(a.match_score > b.match_score);
        assert!(b.matching_skills.is_empty());
        assert_eq!(b.missing_skills, set(&["Go", "Rust"]));
    }

    #[tokio::test]
    async fn test_unknown_candidate_is_not_found_without_side_effects() {
        let store = store(vec![], vec![job(1, &["Python"])]);
        let model = Arc::new(ScriptedModel::default());
        let r = recommender(store.clone(), model.clone(), RecommenderConfig::default());

        let err = r.recommend(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.job_lists.load(Ordering::SeqCst), 0);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_results_capped_and_sorted_with_id_tie_break() {
        let mut jobs: Vec<JobRow> = (1..=15).rev().map(|id| job(id, &["Go", "Rust"])).collect();
        jobs.push(job(100, &["Python"]));
        let store = store(vec![candidate(1, &["Python"])], jobs);
        let model = Arc::new(ScriptedModel::default());
        let r = recommender(store, model.clone(), RecommenderConfig::default());

        let results = r.recommend(1).await.unwrap();
        assert_eq!(results.len(), DEFAULT_RECOMMENDATION_LIMIT);
        assert_eq!(results[0].job_id, 100);
        assert_eq!(results[0].match_score, 100.0);
        assert!(results
            .windows(2)
            .all(|w| w[0].match_score >= w[1].match_score));

        let tied: Vec<i64> = results[1..].iter().map(|m| m.job_id).collect();
        assert_eq!(tied, (1..=9).collect::<Vec<i64>>());

        // only the kept results are explained
        assert_eq!(model.calls.load(Ordering::SeqCst), DEFAULT_RECOMMENDATION_LIMIT);
    }

    #[tokio::test]
    async fn test_oversized_limit_is_capped() {
        let jobs: Vec<JobRow> = (1..=15).map(|id| job(id, &["Python"])).collect();
        let store = store(vec![candidate(1, &["Python"])], jobs);
        let config = RecommenderConfig {
            limit: 25,
            ..RecommenderConfig::default()
        };
        let r = recommender(store, Arc::default(), config);

        let results = r.recommend(1).await.unwrap();
        assert_eq!(results.len(), MAX_RECOMMENDATIONS);
    }

    #[tokio::test]
    async fn test_explainer_outage_still_produces_list() {
        let store = store(
            vec![candidate(1, &["Python"])],
            vec![job(1, &["Python"]), job(2, &["Java"])],
        );
        let model = Arc::new(ScriptedModel {
            fail: true,
            ..Default::default()
        });
        let r = recommender(store, model, RecommenderConfig::default());

        let results = r.recommend(1).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|m| m.explanation == FALLBACK_EXPLANATION));
    }

    #[tokio::test]
    async fn test_candidate_without_skills_scores_zero_everywhere() {
        let store = store(
            vec![candidate(1, &[])],
            vec![job(1, &["Python"]), job(2, &[])],
        );
        let r = recommender(store, Arc::default(), RecommenderConfig::default());

        let results = r.recommend(1).await.unwrap();
        assert!(results.iter().all(|m| m.match_score == 0.0));
        assert_eq!(results[0].missing_skills, set(&["Python"]));
        assert!(results[1].missing_skills.is_empty());
    }

    #[tokio::test]
    async fn test_matching_and_missing_partition_job_skills() {
        let store = store(
            vec![candidate(1, &["python", "Docker", "AWS"])],
            vec![job(1, &["Python", "Kubernetes", "docker", "Terraform"])],
        );
        let r = recommender(store, Arc::default(), RecommenderConfig::default());

        let m = &r.recommend(1).await.unwrap()[0];
        let job_skills = set(&["Python", "Kubernetes", "docker", "Terraform"]);
        let candidate_skills = set(&["python", "Docker", "AWS"]);

        assert_eq!(m.matching_skills.intersection_len(&m.missing_skills), 0);
        assert_eq!(m.matching_skills, job_skills.intersection(&candidate_skills));
        assert_eq!(m.missing_skills, job_skills.difference(&candidate_skills));
        assert_eq!(m.matching_skills.len() + m.missing_skills.len(), job_skills.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_explanations_respect_concurrency_limit() {
        let jobs: Vec<JobRow> = (1..=8).map(|id| job(id, &["Python"])).collect();
        let store = store(vec![candidate(1, &["Python"])], jobs);
        let model = Arc::new(ScriptedModel {
            delay: Some(Duration::from_millis(100)),
            ..Default::default()
        });
        let config = RecommenderConfig {
            limit: 10,
            explain_concurrency: 3,
        };
        let r = recommender(store, model.clone(), config);

        let results = r.recommend(1).await.unwrap();
        assert_eq!(results.len(), 8);
        assert_eq!(model.calls.load(Ordering::SeqCst), 8);
        let peak = model.peak.load(Ordering::SeqCst);
        assert!(peak <= 3 && peak > 1, "peak concurrency was {peak}");
    }

    #[tokio::test]
    async fn test_no_jobs_returns_empty_list() {
        let store = store(vec![candidate(1, &["Python"])], vec![]);
        let r = recommender(store, Arc::default(), RecommenderConfig::default());
        assert!(r.recommend(1).await.unwrap().is_empty());
    }

    #[test]
    fn test_round_score_one_decimal() {
        assert_eq!(round_score(70.929), 70.9);
        assert_eq!(round_score(12.34), 12.3);
        assert_eq!(round_score(0.0), 0.0);
    }
}
