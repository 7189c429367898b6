//! SkillSet: the deduplicated label collection attached to candidates and jobs.
//!
//! Canonicalization: labels are trimmed, inner whitespace runs collapse to a single
//! space, and identity is case-insensitive. The first spelling seen is kept for display,
//! so `"Python"` and `" python "` are the same skill and render as `"Python"`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A set of skill labels keyed by their lowercase canonical form.
///
/// Iteration is ordered by canonical key, which keeps every derived list
/// (matching skills, missing skills, TF-IDF input) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet {
    labels: BTreeMap<String, String>,
}

/// Normalizes a raw label for display. Returns `None` for blank input.
pub fn normalize_label(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn canonical_key(label: &str) -> String {
    label.to_lowercase()
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a label. Returns `false` if it was blank or already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        let Some(display) = normalize_label(raw) else {
            return false;
        };
        let key = canonical_key(&display);
        if self.labels.contains_key(&key) {
            return false;
        }
        self.labels.insert(key, display);
        true
    }

    #[cfg(test)]
    pub fn contains(&self, raw: &str) -> bool {
        normalize_label(raw)
            .map(|d| self.labels.contains_key(&canonical_key(&d)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Display labels in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.values().map(String::as_str)
    }

    /// Labels of `self` that are also in `other`, spelled as in `self`.
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        self.filter_by(|key| other.labels.contains_key(key))
    }

    /// Labels of `self` that are not in `other`, spelled as in `self`.
    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        self.filter_by(|key| !other.labels.contains_key(key))
    }

    pub fn intersection_len(&self, other: &SkillSet) -> usize {
        self.labels
            .keys()
            .filter(|k| other.labels.contains_key(*k))
            .count()
    }

    pub fn union_len(&self, other: &SkillSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }

    /// All labels joined by a single space, the "document" form used for term weighting.
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.labels.values().cloned().collect()
    }

    fn filter_by(&self, keep: impl Fn(&String) -> bool) -> SkillSet {
        SkillSet {
            labels: self
                .labels
                .iter()
                .filter(|(k, _)| keep(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for label in iter {
            set.insert(label.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(labels: Vec<String>) -> Self {
        labels.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.labels.into_values().collect()
    }
}
