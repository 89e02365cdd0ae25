//! Cached repository for the `qr` table.

use async_trait::async_trait;
use mall_core::qr::{normalize_code, MAX_AUTH_COUNT};
use mall_core::types::DbId;

use crate::cached_conn::{format_primary, CachedConn};
use crate::models::qr::{CreateQr, Qr, UpdateQr, CACHE_QR_ID_PREFIX};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, qr_code, auth_count, created_at, updated_at";

/// Data access for verification codes.
///
/// Lookups by id are served from the cache; every write that touches a row
/// invalidates that row's key.
#[async_trait]
pub trait QrModel: Send + Sync {
    /// Insert a new code, returning the created row.
    ///
    /// Clears any not-found placeholder cached for the new id.
    async fn insert(&self, input: &CreateQr) -> Result<Qr, sqlx::Error>;

    /// Find a code by id.
    async fn find_one(&self, id: DbId) -> Result<Option<Qr>, sqlx::Error>;

    /// Update a code. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    async fn update(&self, id: DbId, input: &UpdateQr) -> Result<Option<Qr>, sqlx::Error>;

    /// Delete a code. Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// Atomically add one to `auth_count`.
    ///
    /// Returns `None` if the row does not exist or its count is already
    /// [`MAX_AUTH_COUNT`]; the row is left unchanged in both cases.
    async fn increment_auth_count(&self, id: DbId) -> Result<Option<Qr>, sqlx::Error>;
}

/// [`QrModel`] backed by PostgreSQL and a [`CachedConn`].
#[derive(Clone)]
pub struct QrRepo {
    conn: CachedConn,
}

impl QrRepo {
    pub fn new(conn: CachedConn) -> Self {
        Self { conn }
    }

    fn id_key(id: DbId) -> String {
        format_primary(CACHE_QR_ID_PREFIX, id)
    }
}

#[async_trait]
impl QrModel for QrRepo {
    async fn insert(&self, input: &CreateQr) -> Result<Qr, sqlx::Error> {
        let query = format!(
            "INSERT INTO qr (qr_code, auth_count)
             VALUES ($1, COALESCE($2, 0))
             RETURNING {COLUMNS}"
        );
        let qr_code = normalize_code(&input.qr_code);
        let auth_count = input.auth_count;

        let qr = self
            .conn
            .exec_no_cache(|pool| async move {
                sqlx::query_as::<_, Qr>(&query)
                    .bind(qr_code)
                    .bind(auth_count)
                    .fetch_one(&pool)
                    .await
            })
            .await?;

        // A lookup of this id before the insert may have cached `*`.
        self.conn.del_cache(&[Self::id_key(qr.id)]).await;

        tracing::debug!(qr_id = qr.id, "Qr inserted");
        Ok(qr)
    }

    async fn find_one(&self, id: DbId) -> Result<Option<Qr>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qr WHERE id = $1 LIMIT 1");

        self.conn
            .query_row(&Self::id_key(id), |pool| async move {
                sqlx::query_as::<_, Qr>(&query)
                    .bind(id)
                    .fetch_optional(&pool)
                    .await
            })
            .await
    }

    async fn update(&self, id: DbId, input: &UpdateQr) -> Result<Option<Qr>, sqlx::Error> {
        let query = format!(
            "UPDATE qr SET
                qr_code = COALESCE($2, qr_code),
                auth_count = COALESCE($3, auth_count),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let qr_code = input.qr_code.as_deref().map(normalize_code);
        let auth_count = input.auth_count;

        self.conn
            .exec(&[Self::id_key(id)], |pool| async move {
                sqlx::query_as::<_, Qr>(&query)
                    .bind(id)
                    .bind(qr_code)
                    .bind(auth_count)
                    .fetch_optional(&pool)
                    .await
            })
            .await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let result = self
            .conn
            .exec(&[Self::id_key(id)], |pool| async move {
                sqlx::query("DELETE FROM qr WHERE id = $1")
                    .bind(id)
                    .execute(&pool)
                    .await
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_auth_count(&self, id: DbId) -> Result<Option<Qr>, sqlx::Error> {
        let query = format!(
            "UPDATE qr SET
                auth_count = auth_count + 1,
                updated_at = NOW()
             WHERE id = $1 AND auth_count < $2
             RETURNING {COLUMNS}"
        );

        self.conn
            .exec(&[Self::id_key(id)], |pool| async move {
                sqlx::query_as::<_, Qr>(&query)
                    .bind(id)
                    .bind(MAX_AUTH_COUNT)
                    .fetch_optional(&pool)
                    .await
            })
            .await
    }
}
