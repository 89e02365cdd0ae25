#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use mall_api::config::ServerConfig;
use mall_api::router::build_app_router;
use mall_api::state::AppState;
use mall_db::cache::{CacheConfig, MemoryCacheStore};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        cache: CacheConfig::default(),
    }
}

/// Build the full application router over `pool` and the given cache store.
pub fn build_test_app_with_cache(pool: PgPool, cache: Arc<MemoryCacheStore>) -> Router {
    let config = test_config();
    let state = AppState::new(pool, cache, config.clone());
    build_app_router(state, &config)
}

/// Build the full application router with a fresh in-process cache.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_cache(pool, Arc::new(MemoryCacheStore::new()))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

/// POST raw bytes with a JSON content type.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a code through the API and return its id.
pub async fn create_qr(pool: &PgPool, code: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/qr", serde_json::json!({ "qr_code": code })).await;
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}
