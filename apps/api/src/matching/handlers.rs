//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::matching::MatchResult;
use crate::state::AppState;

/// GET /api/v1/recommendations/:candidate_id
///
/// Top matches for a stored candidate. 404 when the candidate does not exist.
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    let results = state.recommender.recommend(candidate_id).await?;
    Ok(Json(results))
}
