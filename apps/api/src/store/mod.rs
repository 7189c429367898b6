//! Persistence seams for the matching pipeline.
//!
//! The ranker only needs `CandidateStore::get_candidate` and `JobStore::list_jobs`;
//! both are traits so tests can run it against in-memory fixtures.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;

pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn get_candidate(&self, id: i64) -> Result<Option<CandidateRow>, AppError>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<JobRow>, AppError>;
}
