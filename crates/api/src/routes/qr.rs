//! Route definitions for the `/qr` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::qr;
use crate::state::AppState;

/// Routes mounted at `/qr`.
///
/// ```text
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(qr::create)).route(
        "/{id}",
        get(qr::get_by_id).put(qr::update).delete(qr::delete),
    )
}
