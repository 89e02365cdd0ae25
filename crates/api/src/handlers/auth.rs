//! Handler for verification-code authentication.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::error::AppResult;
use crate::logic::auth::{AuthLogic, AuthRequest, AuthResponse};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/auth
///
/// Check a presented code against the stored record and count the
/// verification on success.
pub async fn auth(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let Json(req) = payload?;
    req.validate()?;

    let logic = AuthLogic::new(state.qr_model.clone());
    let resp = logic.auth(&req).await?;
    Ok(Json(DataResponse { data: resp }))
}
