//! Handlers for the `/qr` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mall_core::error::CoreError;
use mall_core::qr::validate_code;
use mall_core::types::DbId;
use mall_db::models::qr::{CreateQr, Qr, UpdateQr};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Qr", id })
}

/// POST /api/v1/qr
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateQr>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Qr>>)> {
    let Json(input) = payload?;
    input.validate()?;
    validate_code(&input.qr_code)?;

    let qr = state.qr_model.insert(&input).await?;
    tracing::info!(qr_id = qr.id, "Qr created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: qr })))
}

/// GET /api/v1/qr/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Qr>>> {
    let qr = state
        .qr_model
        .find_one(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: qr }))
}

/// PUT /api/v1/qr/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<UpdateQr>, JsonRejection>,
) -> AppResult<Json<DataResponse<Qr>>> {
    let Json(input) = payload?;
    input.validate()?;
    if let Some(code) = &input.qr_code {
        validate_code(code)?;
    }

    let qr = state
        .qr_model
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(qr_id = id, "Qr updated");
    Ok(Json(DataResponse { data: qr }))
}

/// DELETE /api/v1/qr/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.qr_model.delete(id).await? {
        tracing::info!(qr_id = id, "Qr deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
