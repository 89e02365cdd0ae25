use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Verification endpoint, merged directly into `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/auth", post(auth::auth))
}
