//! Explanation cache: avoids repeating identical explanation calls across requests.
//!
//! An explanation depends only on the two skill sets and the rounded score, so those
//! form the key. Cache failures are logged and treated as misses.

use async_trait::async_trait;
use tracing::warn;

use crate::skills::SkillSet;

const KEY_PREFIX: &str = "explain:v1";

#[async_trait]
pub trait ExplanationCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn put(&self, key: &str, explanation: &str);
}

/// Cache key built from canonical (lowercase) labels and the score at one decimal.
/// Each set is encoded as a JSON array so labels containing separators stay distinct.
pub fn cache_key(candidate: &SkillSet, job: &SkillSet, score: f64) -> String {
    let canonical = |s: &SkillSet| {
        let labels: Vec<String> = s.iter().map(str::to_lowercase).collect();
        serde_json::to_string(&labels).unwrap_or_default()
    };
    format!(
        "{KEY_PREFIX}:{}|{}|{:.1}",
        canonical(candidate),
        canonical(job),
        score
    )
}

/// Redis-backed cache with a fixed TTL.
pub struct RedisExplanationCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisExplanationCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl ExplanationCache for RedisExplanationCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(c) => c,
            Err(e) => {
                warn!("Explanation cache unavailable: {e}");
                return None;
            }
        };
        match redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut conn)
            .await
        {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Explanation cache read failed: {e}");
                None
            }
        }
    }

    async fn put(&self, key: &str, explanation: &str) {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(c) => c,
            Err(e) => {
                warn!("Explanation cache unavailable: {e}");
                return;
            }
        };
        if let Err(e) = redis::cmd("SET")
            .arg(key)
            .arg(explanation)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
        {
            warn!("Explanation cache write failed: {e}");
        }
    }
}
