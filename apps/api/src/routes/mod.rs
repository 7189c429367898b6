pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;

/// Resume uploads are PDFs; axum's 2 MB default is too small for some.
const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/seed", post(jobs::handle_seed_jobs))
        // Candidates
        .route(
            "/api/v1/resumes",
            post(candidates::handle_upload_resume).layer(DefaultBodyLimit::max(MAX_RESUME_BYTES)),
        )
        // Matching
        .route(
            "/api/v1/recommendations/:candidate_id",
            get(matching::handle_get_recommendations),
        )
        .with_state(state)
}
