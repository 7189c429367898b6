//! Similarity Scorer: pluggable, trait-based scorer for two skill sets.
//!
//! Default: `TfIdfScorer`. Each set's labels are joined into a text blob, weighted with
//! smoothed TF-IDF over the two-document corpus, and compared by cosine similarity.
//! When no term survives tokenization (e.g. only `C` and `R`), the score falls back to
//! the Jaccard index of the raw sets.
//!
//! Scores are always in [0, 100] and depend on nothing but the two sets.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

use crate::skills::SkillSet;

pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("empty vocabulary: no term of two or more word characters")]
    EmptyVocabulary,
}

/// Carried in `Recommender` as `Arc<dyn SimilarityScorer>`.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, candidate: &SkillSet, job: &SkillSet) -> f64;
}

// ────────────────────────────────────────────────────────────────────────────
// TfIdfScorer: default implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfScorer;

impl SimilarityScorer for TfIdfScorer {
    fn score(&self, candidate: &SkillSet, job: &SkillSet) -> f64 {
        if candidate.is_empty() || job.is_empty() {
            return 0.0;
        }

        let raw = match tfidf_cosine(&candidate.joined(), &job.joined()) {
            Ok(similarity) => similarity * MAX_SCORE,
            Err(e) => {
                debug!("TF-IDF unavailable ({e}), falling back to Jaccard");
                jaccard_score(candidate, job)
            }
        };

        clamp_score(raw)
    }
}

/// Jaccard index of the two sets, scaled to 0–100. Zero when `job` is empty.
pub fn jaccard_score(candidate: &SkillSet, job: &SkillSet) -> f64 {
    if job.is_empty() {
        return 0.0;
    }
    let union = candidate.union_len(job);
    let intersection = candidate.intersection_len(job);
    clamp_score(intersection as f64 / union as f64 * MAX_SCORE)
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TF-IDF cosine
// ────────────────────────────────────────────────────────────────────────────

/// Lowercased runs of alphanumeric/underscore characters, at least two characters long.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

fn term_counts(text: &str) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity in [0, 1] between the TF-IDF vectors of two documents.
///
/// idf(t) = ln((1 + n) / (1 + df(t))) + 1 with n = 2; rows are L2-normalized.
pub fn tfidf_cosine(a: &str, b: &str) -> Result<f64, ScoreError> {
    let docs = [term_counts(a), term_counts(b)];

    let vocabulary: BTreeSet<&String> = docs.iter().flat_map(|d| d.keys()).collect();
    if vocabulary.is_empty() {
        return Err(ScoreError::EmptyVocabulary);
    }

    let n = docs.len() as f64;
    let idf: BTreeMap<&String, f64> = vocabulary
        .iter()
        .map(|term| {
            let df = docs.iter().filter(|d| d.contains_key(*term)).count() as f64;
            (*term, ((1.0 + n) / (1.0 + df)).ln() + 1.0)
        })
        .collect();

    let weigh = |doc: &BTreeMap<String, f64>| -> BTreeMap<String, f64> {
        doc.iter()
            .map(|(term, tf)| (term.clone(), tf * idf[term]))
            .collect()
    };
    let va = weigh(&docs[0]);
    let vb = weigh(&docs[1]);

    let norm_a = va.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = vb.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let dot: f64 = va
        .iter()
        .filter_map(|(term, w)| vb.get(term).map(|wb| w * wb))
        .sum();

    Ok((dot / (norm_a * norm_b)).clamp(0.0, 1.0))
}
