//! Login, refresh and logout as seen from the HTTP layer.
//!
//! Refresh ordering matters: a presented token is validated before anything is
//! touched, consumed before its replacement is minted, and the consuming
//! delete is the only thing that decides which of several concurrent
//! redemptions wins.

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::authenticator::Authenticator;
use super::errors::AuthError;
use super::types::AuthenticationResponse;
use crate::config::AuthenticationConfiguration;
use crate::jwt::RefreshTokenValidator;
use crate::password::{verify_dummy, verify_password};
use crate::store::{RefreshTokenStore, UserDirectory};

pub struct AuthenticationFlow<S, D> {
    authenticator: Authenticator<S>,
    refresh_validator: RefreshTokenValidator,
    users: D,
}

impl<S, D> AuthenticationFlow<S, D>
where
    S: RefreshTokenStore,
    D: UserDirectory,
{
    pub fn new(config: Arc<AuthenticationConfiguration>, store: S, users: D) -> Self {
        Self {
            refresh_validator: RefreshTokenValidator::new(&config),
            authenticator: Authenticator::new(config, store),
            users,
        }
    }

    pub fn users(&self) -> &D {
        &self.users
    }

    pub fn tokens(&self) -> &S {
        self.authenticator.store()
    }

    /// Check credentials and issue a fresh pair.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationResponse, AuthError> {
        let user = self.users.find_by_username(username).await?;

        // Argon2 verification blocks; run it off the async workers.
        // Unknown users still pay for one verification.
        let password = password.to_string();
        let password_hash = user.as_ref().map(|u| u.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || match password_hash {
            Some(hash) => verify_password(&password, &hash),
            None => verify_dummy(&password),
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            AuthError::Internal(e.to_string())
        })?;

        let Some(user) = user else {
            debug!(username = %username, "Login for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !matches {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let response = self.authenticator.authenticate(&user).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(response)
    }

    /// Redeem a refresh token for a new pair. The presented token is single-use.
    pub async fn refresh(&self, presented: &str) -> Result<AuthenticationResponse, AuthError> {
        if !self.refresh_validator.validate(presented) {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let store = self.authenticator.store();

        let Some(record) = store.get_by_token(presented).await? else {
            debug!("Refresh token is validly signed but unknown or already used");
            return Err(AuthError::InvalidOrExpiredToken);
        };

        if !store.delete_by_id(&record.id).await? {
            debug!(token_id = %record.id, "Refresh token consumed by a concurrent request");
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let Some(user) = self.users.find_by_id(&record.user_id).await? else {
            warn!(user_id = %record.user_id, "Refresh token owner no longer exists");
            return Err(AuthError::UserNotFound);
        };

        self.authenticator.authenticate(&user).await
    }

    /// Revoke every refresh token held by a user. Issued access tokens stay
    /// valid until they expire.
    pub async fn logout(&self, user_id: &Uuid) -> Result<u64, AuthError> {
        let revoked = self.authenticator.store().delete_all_by_user(user_id).await?;
        info!(user_id = %user_id, revoked, "User logged out");
        Ok(revoked)
    }
}
