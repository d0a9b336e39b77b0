//! Token pair issuance, shared by login and refresh.

use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use super::errors::AuthError;
use super::types::AuthenticationResponse;
use crate::config::AuthenticationConfiguration;
use crate::jwt::{AccessTokenIssuer, JwtError, RefreshTokenIssuer, SignedToken};
use crate::store::{RefreshTokenRecord, RefreshTokenStore, StoreError, User};

/// Mints an access/refresh pair and records the refresh token.
///
/// Refresh never extends an existing token: every call produces a new pair
/// and a new record.
pub struct Authenticator<S> {
    access_tokens: AccessTokenIssuer,
    refresh_tokens: RefreshTokenIssuer,
    store: S,
}

impl<S: RefreshTokenStore> Authenticator<S> {
    pub fn new(config: Arc<AuthenticationConfiguration>, store: S) -> Self {
        Self {
            access_tokens: AccessTokenIssuer::new(config.clone()),
            refresh_tokens: RefreshTokenIssuer::new(config),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn authenticate(&self, user: &User) -> Result<AuthenticationResponse, AuthError> {
        let access = self
            .access_tokens
            .issue(&user.id, &user.username)
            .map_err(internal)?;

        let refresh = match self.issue_and_store(&user.id).await {
            Err(AuthError::Conflict) => {
                warn!(user_id = %user.id, "Refresh token collided with a stored token, retrying");
                self.issue_and_store(&user.id).await?
            }
            other => other?,
        };

        Ok(AuthenticationResponse {
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }

    async fn issue_and_store(&self, user_id: &Uuid) -> Result<SignedToken, AuthError> {
        let refresh = self.refresh_tokens.issue(user_id).map_err(internal)?;

        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: *user_id,
            token: refresh.token.clone(),
            expires_at: refresh.expires_at,
            created_at: refresh.issued_at,
        };

        match self.store.create(&record).await {
            Ok(()) => Ok(refresh),
            Err(StoreError::Conflict) => Err(AuthError::Conflict),
            Err(e) => Err(e.into()),
        }
    }
}

fn internal(e: JwtError) -> AuthError {
    error!(error = %e, "Failed to issue token");
    AuthError::Internal(e.to_string())
}
