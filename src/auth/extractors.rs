//! Axum extractors for authentication.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;
use uuid::Uuid;

use super::bearer::get_bearer_token;
use super::errors::{ApiAuthError, AuthErrorKind};
use super::state::HasAuthBackend;
use super::types::AuthenticatedUser;
use crate::jwt::USER_ID_CLAIM;

/// Verify the bearer access token on a request.
fn authenticate_request<S>(parts: &Parts, state: &S) -> Result<AuthenticatedUser, AuthErrorKind>
where
    S: HasAuthBackend,
{
    let token = get_bearer_token(&parts.headers).ok_or(AuthErrorKind::NotAuthenticated)?;

    let claims = state.access_tokens().validate(token).map_err(|e| {
        debug!(error = %e, "Access token rejected");
        AuthErrorKind::InvalidToken
    })?;

    let user_id = claims
        .claims
        .get(USER_ID_CLAIM)
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| {
            debug!("Access token has no usable user id claim");
            AuthErrorKind::InvalidToken
        })?;

    Ok(AuthenticatedUser { user_id })
}

/// Extractor for endpoints that require a valid access token.
/// Stateless: the token is checked against the access secret only, so a
/// logged-out user's access token keeps working until it expires.
pub struct BearerAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate_request(parts, state)
            .map(BearerAuth)
            .map_err(ApiAuthError::new)
    }
}
