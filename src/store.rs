//! Persistence capabilities used by the authentication core.
//!
//! The core never caches token state: every operation is a round trip to the
//! store, so several server instances sharing one store see the same records.

use std::future::Future;
use uuid::Uuid;

/// A user account, as far as token issuance is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// An issued refresh token. Created once, deleted once, never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The signed refresh token string (unique)
    pub token: String,
    /// Expiration timestamp (Unix seconds), same as the token's `exp`
    pub expires_at: u64,
    /// Creation timestamp (Unix seconds)
    pub created_at: u64,
}

/// Store failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique value (token string, username, email) already exists
    Conflict,
    /// Timeout, connectivity or other backend failure
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict => write!(f, "Unique constraint violated"),
            StoreError::Unavailable(reason) => write!(f, "Store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persistence for refresh-token records.
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new record. Fails with `StoreError::Conflict` if the token string exists.
    fn create(
        &self,
        record: &RefreshTokenRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Exact-match lookup. `None` is a normal outcome.
    fn get_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<RefreshTokenRecord>, StoreError>> + Send;

    /// Delete one record. Idempotent: returns `true` only for the call that
    /// actually removed it, `false` if it was already gone.
    fn delete_by_id(&self, id: &Uuid) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Delete every record owned by a user. Returns the number removed.
    fn delete_all_by_user(
        &self,
        user_id: &Uuid,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// User account lookup and creation. Password checks happen outside this trait.
pub trait UserDirectory: Send + Sync {
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    fn find_by_id(&self, id: &Uuid) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    fn create(&self, user: &User) -> impl Future<Output = Result<(), StoreError>> + Send;
}
