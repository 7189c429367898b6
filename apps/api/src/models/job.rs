use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::skills::SkillSet;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub posted_date: NaiveDate,
    pub skills: Vec<String>,
}

impl JobRow {
    pub fn skill_set(&self) -> SkillSet {
        self.skills.iter().collect()
    }
}

/// Fields for inserting a job. `id` is set only when the posting comes from a
/// source with its own identifiers (seeding), which makes the insert an upsert.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub id: Option<i64>,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub posted_date: NaiveDate,
    pub skills: SkillSet,
}
