//! HTTP-level integration tests for `POST /api/v1/auth`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, post_json, post_raw, put_json};
use mall_db::cache::MemoryCacheStore;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn matching_code_is_authorized_and_counted(pool: PgPool) {
    let id = common::create_qr(&pool, "AUTH-001").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth",
        serde_json::json!({ "id": id, "qr_code": "AUTH-001" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["auth_count"], 1);
    assert_eq!(json["data"]["authorized"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_auth_counts_through_warm_cache(pool: PgPool) {
    let id = common::create_qr(&pool, "AUTH-002").await;
    let cache = Arc::new(MemoryCacheStore::new());

    for expected in 1..=3 {
        let app = common::build_test_app_with_cache(pool.clone(), cache.clone());
        let response = post_json(
            app,
            "/api/v1/auth",
            serde_json::json!({ "id": id, "qr_code": "AUTH-002" }),
        )
        .await;
        let json = body_json(response).await;
        assert_eq!(json["data"]["auth_count"], expected);
    }

    let app = common::build_test_app_with_cache(pool, cache);
    let json = body_json(get(app, &format!("/api/v1/qr/{id}")).await).await;
    assert_eq!(json["data"]["auth_count"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_code_returns_401(pool: PgPool) {
    let id = common::create_qr(&pool, "AUTH-003").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth",
        serde_json::json!({ "id": id, "qr_code": "WRONG" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/qr/{id}")).await).await;
    assert_eq!(json["data"]["auth_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn saturated_count_returns_409_and_is_unchanged(pool: PgPool) {
    let id = common::create_qr(&pool, "AUTH-MAX").await;
    let cache = Arc::new(MemoryCacheStore::new());

    let app = common::build_test_app_with_cache(pool.clone(), cache.clone());
    let response = put_json(
        app,
        &format!("/api/v1/qr/{id}"),
        serde_json::json!({ "auth_count": i64::MAX }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app_with_cache(pool.clone(), cache.clone());
    let response = post_json(
        app,
        "/api/v1/auth",
        serde_json::json!({ "id": id, "qr_code": "AUTH-MAX" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    let app = common::build_test_app_with_cache(pool, cache);
    let json = body_json(get(app, &format!("/api/v1/qr/{id}")).await).await;
    assert_eq!(json["data"]["auth_count"], i64::MAX);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_id_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth",
        serde_json::json!({ "id": 999999, "qr_code": "AUTH-404" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_fields_return_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/auth", serde_json::json!({ "id": 1 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_body_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_raw(app, "/api/v1/auth", "[1, 2").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_positive_id_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth",
        serde_json::json!({ "id": 0, "qr_code": "AUTH-000" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
