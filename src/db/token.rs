//! Refresh token storage for rotation and revocation.
//!
//! Only refresh tokens are stored. Access tokens are stateless and expire by time.

use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use super::store_error;
use crate::store::{RefreshTokenRecord, RefreshTokenStore, StoreError};

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    id: String,
    user_id: String,
    token: String,
    expires_at: i64,
    created_at: i64,
}

impl TryFrom<RefreshTokenRow> for RefreshTokenRecord {
    type Error = StoreError;

    fn try_from(row: RefreshTokenRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            token: row.token,
            expires_at: from_db_timestamp(row.expires_at)?,
            created_at: from_db_timestamp(row.created_at)?,
        })
    }
}

/// Convert a Unix timestamp for storage. SQLite integers are signed.
fn to_db_timestamp(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::Unavailable(format!("Timestamp {} out of range", value)))
}

fn from_db_timestamp(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value)
        .map_err(|_| StoreError::Unavailable(format!("Corrupt timestamp {}", value)))
}

pub(super) fn parse_uuid(value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt id '{}': {}", value, e)))
}

/// SQLite-backed refresh token store.
#[derive(Clone)]
pub struct TokenStore {
    pool: SqlitePool,
}

impl TokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Delete all records whose expiry is before `now` (Unix seconds).
    pub async fn delete_expired(&self, now: u64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(to_db_timestamp(now)?)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete expired tokens", e))?;
        Ok(result.rows_affected())
    }

    /// Count the records owned by a user.
    #[cfg(test)]
    pub async fn count_by_user(&self, user_id: &Uuid) -> Result<u64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("Failed to count tokens", e))?;
        u64::try_from(count.0).map_err(|_| StoreError::Unavailable("Negative count".to_string()))
    }
}

impl RefreshTokenStore for TokenStore {
    async fn create(&self, record: &RefreshTokenRecord) -> Result<(), StoreError> {
        let expires_at = to_db_timestamp(record.expires_at)?;
        let created_at = to_db_timestamp(record.created_at)?;
        sqlx::query(
            "INSERT INTO refresh_tokens (id, user_id, token, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.token)
        .bind(expires_at)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to store refresh token", e))?;
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            "SELECT id, user_id, token, expires_at, created_at FROM refresh_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to look up refresh token", e))?;

        row.map(RefreshTokenRecord::try_from).transpose()
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete refresh token", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_by_user(&self, user_id: &Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete user tokens", e))?;
        Ok(result.rows_affected())
    }
}
