//! Key-value cache in front of the relational store.
//!
//! Repositories never talk to a cache store directly; they go through
//! [`crate::cached_conn::CachedConn`], which owns the read-through and
//! invalidate-after-write rules. This module only provides the storage
//! backends and their configuration.

mod memory_store;
mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

pub use memory_store::MemoryCacheStore;
pub use redis_store::RedisCacheStore;

/// Value written in place of a row that does not exist, so repeated lookups
/// of a missing id do not reach the database.
pub const NOT_FOUND_PLACEHOLDER: &str = "*";

/// Default lifetime of a cached row (7 days).
pub const DEFAULT_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Default lifetime of a not-found placeholder.
pub const DEFAULT_NOT_FOUND_EXPIRY_SECS: u64 = 60;

/// Maximum relative deviation applied to row expiries.
pub const EXPIRY_DEVIATION: f64 = 0.05;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache entry could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A string key-value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Remove every key in `keys`. Missing keys are not an error.
    async fn del(&self, keys: &[String]) -> Result<(), CacheError>;
}

/// Cache configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis connection URL. When absent a process-local store is used.
    pub redis_url: Option<String>,
    /// Base lifetime of cached rows, before jitter.
    pub expiry: Duration,
    /// Lifetime of not-found placeholders.
    pub not_found_expiry: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            expiry: Duration::from_secs(DEFAULT_EXPIRY_SECS),
            not_found_expiry: Duration::from_secs(DEFAULT_NOT_FOUND_EXPIRY_SECS),
        }
    }
}

impl CacheConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default   |
    /// |-------------------------------|-----------|
    /// | `CACHE_REDIS_URL`             | (unset)   |
    /// | `CACHE_EXPIRY_SECS`           | `604800`  |
    /// | `CACHE_NOT_FOUND_EXPIRY_SECS` | `60`      |
    pub fn from_env() -> Self {
        let redis_url = std::env::var("CACHE_REDIS_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let expiry_secs: u64 = std::env::var("CACHE_EXPIRY_SECS")
            .map(|v| v.parse().expect("CACHE_EXPIRY_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_EXPIRY_SECS);

        let not_found_expiry_secs: u64 = std::env::var("CACHE_NOT_FOUND_EXPIRY_SECS")
            .map(|v| {
                v.parse()
                    .expect("CACHE_NOT_FOUND_EXPIRY_SECS must be a valid u64")
            })
            .unwrap_or(DEFAULT_NOT_FOUND_EXPIRY_SECS);

        Self {
            redis_url,
            expiry: Duration::from_secs(expiry_secs),
            not_found_expiry: Duration::from_secs(not_found_expiry_secs),
        }
    }
}

/// Scale `base` by a random factor in `[1 - EXPIRY_DEVIATION, 1 + EXPIRY_DEVIATION]`.
pub fn jittered_expiry(base: Duration) -> Duration {
    let factor = rand::rng().random_range((1.0 - EXPIRY_DEVIATION)..=(1.0 + EXPIRY_DEVIATION));
    base.mul_f64(factor)
}

/// Open the cache store described by `config`.
pub async fn connect_cache_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>, CacheError> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisCacheStore::connect(url).await?;
            tracing::info!("Redis cache store connected");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("CACHE_REDIS_URL not set, using in-process cache store");
            Ok(Arc::new(MemoryCacheStore::new()))
        }
    }
}
