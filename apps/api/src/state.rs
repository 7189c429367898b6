use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::matching::Recommender;
use crate::skills::SkillExtractor;
use crate::store::PgStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: PgStore,
    pub s3: S3Client,
    /// Plain HTTP client for the job seed source. LLM traffic goes through llm_client.
    pub http: reqwest::Client,
    pub config: Config,
    /// IngestText: used for both resumes and job postings at creation time.
    pub extractor: SkillExtractor,
    /// GetRecommendations. Holds its own store, scorer and explainer handles.
    pub recommender: Arc<Recommender>,
}
