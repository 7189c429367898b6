//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::seed::{build_seed_jobs, fetch_seed_posts};
use crate::models::job::{JobRow, NewJob};
use crate::state::AppState;
use crate::store::postgres::JobFilter;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub requirements: String,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub seeded: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let filter = JobFilter {
        search: query.search,
        location: query.location,
    };
    let jobs = state.store.search_jobs(&filter).await?;
    Ok(Json(jobs))
}

/// POST /api/v1/jobs
///
/// Skills are extracted once here from description + requirements and stored with the job.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::Validation("description cannot be empty".to_string()));
    }

    let text = format!("{}\n{}", request.description, request.requirements);
    let skills = state.extractor.extract_skills(&text).await;

    let job = state
        .store
        .upsert_job(&NewJob {
            id: None,
            title: request.title,
            company: request.company,
            location: request.location,
            description: request.description,
            requirements: request.requirements,
            posted_date: Utc::now().date_naive(),
            skills,
        })
        .await?;

    info!("Created job {} with {} skills", job.id, job.skills.len());
    Ok((StatusCode::CREATED, Json(job)))
}

/// POST /api/v1/jobs/seed
///
/// Pulls placeholder posts from the configured seed source and upserts them as jobs.
pub async fn handle_seed_jobs(
    State(state): State<AppState>,
) -> Result<Json<SeedResponse>, AppError> {
    let posts = fetch_seed_posts(&state.http, &state.config.seed_source_url).await?;
    let jobs = build_seed_jobs(posts, &state.extractor, state.config.seed_concurrency).await;

    for job in &jobs {
        state.store.upsert_job(job).await?;
    }
    state.store.sync_job_id_sequence().await?;

    info!("Seeded {} jobs", jobs.len());
    Ok(Json(SeedResponse {
        message: format!("Seeded {} jobs", jobs.len()),
        seeded: jobs.len(),
    }))
}
