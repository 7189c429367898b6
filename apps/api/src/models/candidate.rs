use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::skills::SkillSet;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub resume_text: String,
    pub skills: Vec<String>,
    /// Object key of the archived resume PDF, when the upload was stored.
    pub resume_s3_key: Option<String>,
    pub created_date: NaiveDate,
}

impl CandidateRow {
    pub fn skill_set(&self) -> SkillSet {
        self.skills.iter().collect()
    }
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub resume_text: String,
    pub skills: SkillSet,
    pub resume_s3_key: Option<String>,
}
