pub mod auth;
pub mod health;
pub mod qr;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth                verify a code (POST)
///
/// /qr                  create (POST)
/// /qr/{id}             get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/qr", qr::router())
}
