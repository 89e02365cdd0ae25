use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Key read to check that the cache store answers. It is never written.
const CACHE_PING_KEY: &str = "health:ping";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answers, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the cache store is reachable. Reads fall back to the
    /// database when it is not, so this only degrades the status.
    pub cache_healthy: bool,
}

/// GET /health -- reports database and cache reachability.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = mall_db::health_check(&state.pool).await.is_ok();

    let cache_healthy = match state.cache.get(CACHE_PING_KEY).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Cache health check failed");
            false
        }
    };

    let status = if db_healthy && cache_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        cache_healthy,
    })
}

/// Mount health check routes (root level, outside `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
