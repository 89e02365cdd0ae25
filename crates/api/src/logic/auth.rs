//! Verification-code authentication.
//!
//! A presented code is checked against the stored record; on a match the
//! record's `auth_count` is incremented and the new count returned. A code
//! whose count has reached [`MAX_AUTH_COUNT`] is refused with a conflict.

use std::sync::Arc;

use mall_core::error::CoreError;
use mall_core::qr::{codes_match, validate_code, MAX_AUTH_COUNT};
use mall_core::types::DbId;
use mall_db::repositories::QrModel;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Body of `POST /api/v1/auth`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AuthRequest {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(length(min = 1, max = 64))]
    pub qr_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthResponse {
    pub id: DbId,
    pub auth_count: i64,
    pub authorized: bool,
}

pub struct AuthLogic {
    model: Arc<dyn QrModel>,
}

impl AuthLogic {
    pub fn new(model: Arc<dyn QrModel>) -> Self {
        Self { model }
    }

    pub async fn auth(&self, req: &AuthRequest) -> AppResult<AuthResponse> {
        validate_code(&req.qr_code)?;

        let qr = self
            .model
            .find_one(req.id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Qr",
                id: req.id,
            }))?;

        if !codes_match(&qr.qr_code, &req.qr_code) {
            tracing::info!(qr_id = req.id, "Verification code rejected");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Verification code does not match".into(),
            )));
        }

        if qr.auth_count >= MAX_AUTH_COUNT {
            return Err(limit_reached(req.id));
        }

        let updated = match self.model.increment_auth_count(req.id).await? {
            Some(updated) => updated,
            // The row was deleted or hit the limit after the lookup.
            None => {
                return Err(match self.model.find_one(req.id).await? {
                    Some(_) => limit_reached(req.id),
                    None => AppError::Core(CoreError::NotFound {
                        entity: "Qr",
                        id: req.id,
                    }),
                });
            }
        };

        tracing::info!(
            qr_id = updated.id,
            auth_count = updated.auth_count,
            "Verification code accepted",
        );

        Ok(AuthResponse {
            id: updated.id,
            auth_count: updated.auth_count,
            authorized: true,
        })
    }
}

fn limit_reached(id: DbId) -> AppError {
    tracing::warn!(qr_id = id, "Verification count limit reached");
    AppError::Core(CoreError::Conflict("Verification count limit reached".into()))
}
