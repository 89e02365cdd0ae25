//! Verification-code (`qr`) entity model and DTOs.

use mall_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Key prefix for rows cached by primary key.
pub const CACHE_QR_ID_PREFIX: &str = "cache:qr:id:";

/// A row from the `qr` table.
///
/// Also the cached representation, hence `Deserialize`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Qr {
    pub id: DbId,
    /// The verification code.
    pub qr_code: String,
    /// Number of successful verifications.
    pub auth_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new verification code.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQr {
    #[validate(length(min = 1, max = 64))]
    pub qr_code: String,
    /// Defaults to 0 if omitted.
    #[validate(range(min = 0))]
    pub auth_count: Option<i64>,
}

/// DTO for updating an existing verification code. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQr {
    #[validate(length(min = 1, max = 64))]
    pub qr_code: Option<String>,
    #[validate(range(min = 0))]
    pub auth_count: Option<i64>,
}
