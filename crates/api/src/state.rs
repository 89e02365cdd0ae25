use std::sync::Arc;

use mall_db::cache::CacheStore;
use mall_db::cached_conn::CachedConn;
use mall_db::repositories::{QrModel, QrRepo};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks).
    pub pool: mall_db::DbPool,
    /// Cache store shared by the repositories (health checks).
    pub cache: Arc<dyn CacheStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cached data access for verification codes.
    pub qr_model: Arc<dyn QrModel>,
}

impl AppState {
    /// Wire the cached repositories over `pool` and `cache`.
    pub fn new(pool: mall_db::DbPool, cache: Arc<dyn CacheStore>, config: ServerConfig) -> Self {
        let conn = CachedConn::new(pool.clone(), cache.clone(), config.cache.clone());

        Self {
            pool,
            cache,
            config: Arc::new(config),
            qr_model: Arc::new(QrRepo::new(conn)),
        }
    }
}
