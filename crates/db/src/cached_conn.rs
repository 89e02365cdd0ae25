//! A database pool paired with a cache store.
//!
//! Reads go through [`CachedConn::query_row`]: cache first, database on a
//! miss, and the result (or a not-found placeholder) written back. Writes go
//! through [`CachedConn::exec`], which deletes the affected keys once the
//! statement has succeeded. Cache failures are logged and never surface to
//! callers; the database stays the source of truth.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{jittered_expiry, CacheConfig, CacheStore, NOT_FOUND_PLACEHOLDER};
use crate::DbPool;

/// Outcome of consulting the cache for a single key.
#[derive(Debug)]
enum CacheLookup<T> {
    Hit(T),
    NotFound,
    Miss,
}

#[derive(Clone)]
pub struct CachedConn {
    pool: DbPool,
    cache: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl CachedConn {
    pub fn new(pool: DbPool, cache: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            pool,
            cache,
            config,
        }
    }

    /// Read a single row through the cache.
    ///
    /// `loader` runs only on a cache miss and receives a handle to the pool.
    pub async fn query_row<T, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>, sqlx::Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(DbPool) -> Fut,
        Fut: Future<Output = Result<Option<T>, sqlx::Error>>,
    {
        match self.read_cache::<T>(key).await {
            CacheLookup::Hit(value) => return Ok(Some(value)),
            CacheLookup::NotFound => return Ok(None),
            CacheLookup::Miss => {}
        }

        let row = loader(self.pool.clone()).await?;

        match &row {
            Some(value) => self.write_cache(key, value).await,
            None => self.write_placeholder(key).await,
        }

        Ok(row)
    }

    /// Run a write, then invalidate `keys`.
    ///
    /// Keys are left untouched when the write itself fails.
    pub async fn exec<R, F, Fut>(&self, keys: &[String], op: F) -> Result<R, sqlx::Error>
    where
        F: FnOnce(DbPool) -> Fut,
        Fut: Future<Output = Result<R, sqlx::Error>>,
    {
        let result = op(self.pool.clone()).await?;
        self.del_cache(keys).await;
        Ok(result)
    }

    /// Run a write that cannot affect any cached key.
    pub async fn exec_no_cache<R, F, Fut>(&self, op: F) -> Result<R, sqlx::Error>
    where
        F: FnOnce(DbPool) -> Fut,
        Fut: Future<Output = Result<R, sqlx::Error>>,
    {
        op(self.pool.clone()).await
    }

    /// Remove `keys` from the cache, logging on failure.
    pub async fn del_cache(&self, keys: &[String]) {
        if let Err(err) = self.cache.del(keys).await {
            tracing::error!(error = %err, ?keys, "Failed to invalidate cache keys");
        }
    }

    async fn read_cache<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(err) => {
                tracing::warn!(error = %err, key, "Cache read failed, falling back to database");
                return CacheLookup::Miss;
            }
        };

        if raw == NOT_FOUND_PLACEHOLDER {
            return CacheLookup::NotFound;
        }

        match serde_json::from_str(&raw) {
            Ok(value) => CacheLookup::Hit(value),
            Err(err) => {
                tracing::warn!(error = %err, key, "Discarding undecodable cache entry");
                self.del_cache(&[key.to_string()]).await;
                CacheLookup::Miss
            }
        }
    }

    async fn write_cache<T: Serialize>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(error = %err, key, "Failed to encode cache entry");
                return;
            }
        };

        let ttl = jittered_expiry(self.config.expiry);
        if let Err(err) = self.cache.set_with_expiry(key, &encoded, ttl).await {
            tracing::warn!(error = %err, key, "Cache write failed");
        }
    }

    async fn write_placeholder(&self, key: &str) {
        if let Err(err) = self
            .cache
            .set_with_expiry(key, NOT_FOUND_PLACEHOLDER, self.config.not_found_expiry)
            .await
        {
            tracing::warn!(error = %err, key, "Cache placeholder write failed");
        }
    }
}

/// Build the cache key for a primary-key lookup.
pub fn format_primary(prefix: &str, primary: impl Display) -> String {
    format!("{prefix}{primary}")
}
