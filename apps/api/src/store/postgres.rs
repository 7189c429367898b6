use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, NewCandidate};
use crate::models::job::{JobRow, NewJob};
use crate::store::{CandidateStore, JobStore};

/// Optional filters for job listing. Both match case-insensitive substrings.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Matched against title or company.
    pub search: Option<String>,
    pub location: Option<String>,
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists jobs newest first, ties by id.
    pub async fn search_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRow>, AppError> {
        let search = non_blank(filter.search.as_deref()).map(like_pattern);
        let location = non_blank(filter.location.as_deref()).map(like_pattern);

        let jobs = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE ($1::text IS NULL OR title ILIKE $1 OR company ILIKE $1)
              AND ($2::text IS NULL OR location ILIKE $2)
            ORDER BY posted_date DESC, id ASC
            "#,
        )
        .bind(search)
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    /// Inserts a job, or replaces it when `job.id` is set and already exists.
    pub async fn upsert_job(&self, job: &NewJob) -> Result<JobRow, AppError> {
        let skills = job.skills.to_vec();

        let row = match job.id {
            Some(id) => {
                sqlx::query_as::<_, JobRow>(
                    r#"
                    INSERT INTO jobs
                        (id, title, company, location, description, requirements, posted_date, skills)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    ON CONFLICT (id) DO UPDATE SET
                        title = EXCLUDED.title,
                        company = EXCLUDED.company,
                        location = EXCLUDED.location,
                        description = EXCLUDED.description,
                        requirements = EXCLUDED.requirements,
                        posted_date = EXCLUDED.posted_date,
                        skills = EXCLUDED.skills
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&job.title)
                .bind(&job.company)
                .bind(&job.location)
                .bind(&job.description)
                .bind(&job.requirements)
                .bind(job.posted_date)
                .bind(&skills)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, JobRow>(
                    r#"
                    INSERT INTO jobs
                        (title, company, location, description, requirements, posted_date, skills)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING *
                    "#,
                )
                .bind(&job.title)
                .bind(&job.company)
                .bind(&job.location)
                .bind(&job.description)
                .bind(&job.requirements)
                .bind(job.posted_date)
                .bind(&skills)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(row)
    }

    /// Moves the id sequence past explicitly inserted ids so later inserts don't collide.
    pub async fn sync_job_id_sequence(&self) -> Result<(), AppError> {
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('jobs', 'id'), COALESCE((SELECT MAX(id) FROM jobs), 1))",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_candidate(&self, candidate: &NewCandidate) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO candidates (name, email, resume_text, skills, resume_s3_key)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.resume_text)
        .bind(candidate.skills.to_vec())
        .bind(candidate.resume_s3_key.as_deref())
        .fetch_one(&self.pool)
        .await?;

        info!("Stored candidate {id} with {} skills", candidate.skills.len());
        Ok(id)
    }
}

#[async_trait]
impl CandidateStore for PgStore {
    async fn get_candidate(&self, id: i64) -> Result<Option<CandidateRow>, AppError> {
        let candidate =
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(candidate)
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn list_jobs(&self) -> Result<Vec<JobRow>, AppError> {
        let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Wraps user input in `%…%` for ILIKE, escaping LIKE metacharacters.
fn like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 2);
    escaped.push('%');
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
