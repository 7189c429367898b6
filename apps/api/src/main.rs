mod candidates;
mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod routes;
mod skills;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{LlmClient, TextModel};
use crate::matching::cache::RedisExplanationCache;
use crate::matching::{MatchExplainer, Recommender, RecommenderConfig, TfIdfScorer};
use crate::routes::build_router;
use crate::skills::SkillExtractor;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;
    let store = PgStore::new(db);

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm: Arc<dyn TextModel> = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let llm_timeout = Duration::from_secs(config.llm_timeout_secs);
    let extractor = SkillExtractor::new(llm.clone(), llm_timeout);

    let mut explainer = MatchExplainer::new(llm, llm_timeout);
    if let Some(redis_url) = &config.redis_url {
        let redis = redis::Client::open(redis_url.as_str())?;
        explainer = explainer.with_cache(Arc::new(RedisExplanationCache::new(
            redis,
            config.explanation_cache_ttl_secs,
        )));
        info!("Explanation cache enabled (Redis)");
    }

    let recommender = Recommender::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(TfIdfScorer),
        explainer,
        RecommenderConfig {
            limit: config.recommendation_limit,
            explain_concurrency: config.explain_concurrency,
        },
    );
    info!(
        "Recommender ready: limit={}, explain_concurrency={}, llm_timeout={}s",
        config.recommendation_limit, config.explain_concurrency, config.llm_timeout_secs
    );

    // Build app state
    let state = AppState {
        store,
        s3,
        http: reqwest::Client::new(),
        config: config.clone(),
        extractor,
        recommender: Arc::new(recommender),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobmatch-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
