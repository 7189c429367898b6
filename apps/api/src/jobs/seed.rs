//! Job seeding: turns placeholder posts into job postings with extracted skills.
//!
//! The source returns `{id, title, body}` posts; companies and locations are assigned
//! round-robin from fixed lists.

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::job::NewJob;
use crate::skills::{SkillExtractor, SkillSet};

pub const SEED_LIMIT: usize = 20;

const COMPANIES: [&str; 8] = [
    "Google",
    "Microsoft",
    "Amazon",
    "Meta",
    "Netflix",
    "Apple",
    "Tesla",
    "Uber",
];

const LOCATIONS: [&str; 5] = [
    "San Francisco, CA",
    "New York, NY",
    "Austin, TX",
    "Seattle, WA",
    "Boston, MA",
];

#[derive(Debug, Clone, Deserialize)]
pub struct SeedPost {
    pub id: i64,
    pub title: String,
    pub body: String,
}

pub async fn fetch_seed_posts(
    http: &reqwest::Client,
    url: &str,
) -> Result<Vec<SeedPost>, AppError> {
    let response = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::Upstream(format!("Seed source request failed: {e}")))?;

    let mut posts: Vec<SeedPost> = response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Seed source returned invalid JSON: {e}")))?;

    posts.truncate(SEED_LIMIT);
    info!("Fetched {} seed posts from {url}", posts.len());
    Ok(posts)
}

/// Builds a job posting from the `index`-th seed post.
pub fn seed_job(index: usize, post: SeedPost, skills: SkillSet, posted_date: NaiveDate) -> NewJob {
    NewJob {
        id: Some(post.id),
        requirements: format!("Requirements for {}", post.title),
        title: post.title,
        company: COMPANIES[index % COMPANIES.len()].to_string(),
        location: LOCATIONS[index % LOCATIONS.len()].to_string(),
        description: post.body,
        posted_date,
        skills,
    }
}

/// Extracts skills for every post (bounded concurrency) and builds the job rows in input order.
pub async fn build_seed_jobs(
    posts: Vec<SeedPost>,
    extractor: &SkillExtractor,
    concurrency: usize,
) -> Vec<NewJob> {
    let today = Utc::now().date_naive();
    stream::iter(posts.into_iter().enumerate().map(|(i, post)| async move {
        let skills = extractor.extract_skills(&post.body).await;
        seed_job(i, post, skills, today)
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await
}
