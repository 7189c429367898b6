use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::matching::ranker::MAX_RECOMMENDATIONS;

const DEFAULT_SEED_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Enables the explanation cache when set.
    pub redis_url: Option<String>,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub seed_source_url: String,
    /// Between 1 and `MAX_RECOMMENDATIONS`.
    pub recommendation_limit: usize,
    pub explain_concurrency: usize,
    /// Concurrent skill extraction calls while seeding jobs.
    pub seed_concurrency: usize,
    pub llm_timeout_secs: u64,
    pub explanation_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            redis_url: lookup("REDIS_URL").filter(|v| !v.is_empty()),
            s3_bucket: require("S3_BUCKET")?,
            s3_endpoint: require("S3_ENDPOINT")?,
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            port: parse_value("PORT", lookup("PORT"), 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            seed_source_url: lookup("SEED_SOURCE_URL")
                .unwrap_or_else(|| DEFAULT_SEED_SOURCE_URL.to_string()),
            recommendation_limit: within_range(
                "RECOMMENDATION_LIMIT",
                parse_value(
                    "RECOMMENDATION_LIMIT",
                    lookup("RECOMMENDATION_LIMIT"),
                    MAX_RECOMMENDATIONS,
                )?,
                1,
                MAX_RECOMMENDATIONS,
            )?,
            explain_concurrency: parse_value(
                "EXPLAIN_CONCURRENCY",
                lookup("EXPLAIN_CONCURRENCY"),
                4,
            )?,
            seed_concurrency: parse_value("SEED_CONCURRENCY", lookup("SEED_CONCURRENCY"), 4)?,
            llm_timeout_secs: parse_value("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"), 20)?,
            explanation_cache_ttl_secs: parse_value(
                "EXPLANATION_CACHE_TTL_SECS",
                lookup("EXPLANATION_CACHE_TTL_SECS"),
                86_400,
            )?,
        })
    }
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}

fn within_range(key: &str, value: usize, min: usize, max: usize) -> Result<usize> {
    if !(min..=max).contains(&value) {
        bail!("{key} must be between {min} and {max}, got {value}");
    }
    Ok(value)
}
