//! Access and refresh token issuers.
//!
//! Both wrap `TokenSigner` with their own secret, lifetime and claim policy.
//! They hold only the shared configuration, so one instance serves all requests.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use std::sync::Arc;
use uuid::Uuid;

use super::{ClaimSet, JwtError, SignedToken, TokenSigner};
use crate::config::AuthenticationConfiguration;

/// Claim holding the user id (both token kinds).
pub const USER_ID_CLAIM: &str = "id";

/// Claim holding the username (access tokens only).
pub const USERNAME_CLAIM: &str = "username";

/// Claim holding the random token identifier (refresh tokens only).
pub const TOKEN_ID_CLAIM: &str = "jti";

/// Issues short-lived access tokens carrying the user id and username.
#[derive(Debug, Clone)]
pub struct AccessTokenIssuer {
    config: Arc<AuthenticationConfiguration>,
    signer: TokenSigner,
}

impl AccessTokenIssuer {
    pub fn new(config: Arc<AuthenticationConfiguration>) -> Self {
        Self {
            config,
            signer: TokenSigner::new(),
        }
    }

    pub fn issue(&self, user_id: &Uuid, username: &str) -> Result<SignedToken, JwtError> {
        let claims = ClaimSet::new()
            .with(USER_ID_CLAIM, user_id.to_string())
            .with(USERNAME_CLAIM, username);

        self.signer.sign(
            self.config.access_token_secret(),
            self.config.issuer(),
            self.config.audience(),
            self.config.access_token_expiration_minutes(),
            &claims,
        )
    }
}

/// Issues long-lived refresh tokens carrying the user id and a random token id.
#[derive(Debug, Clone)]
pub struct RefreshTokenIssuer {
    config: Arc<AuthenticationConfiguration>,
    signer: TokenSigner,
}

impl RefreshTokenIssuer {
    pub fn new(config: Arc<AuthenticationConfiguration>) -> Self {
        Self {
            config,
            signer: TokenSigner::new(),
        }
    }

    /// Issue a refresh token. Two tokens for the same user in the same second
    /// still differ, since each gets its own token id.
    pub fn issue(&self, user_id: &Uuid) -> Result<SignedToken, JwtError> {
        let claims = ClaimSet::new()
            .with(USER_ID_CLAIM, user_id.to_string())
            .with(TOKEN_ID_CLAIM, generate_token_id());

        self.signer.sign(
            self.config.refresh_token_secret(),
            self.config.issuer(),
            self.config.audience(),
            self.config.refresh_token_expiration_minutes(),
            &claims,
        )
    }
}

/// 128 random bits, base64url encoded.
fn generate_token_id() -> String {
    let mut bytes = [0u8; 16];
    rand::RngCore::fill_bytes(&mut rand::rng(), &mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use crate::jwt::{AccessTokenValidator, RefreshTokenValidator};

    #[test]
    fn test_access_token_carries_id_and_username() {
        let config = Arc::new(test_config());
        let user_id = Uuid::new_v4();

        let signed = AccessTokenIssuer::new(config.clone())
            .issue(&user_id, "alice")
            .unwrap();

        let claims = AccessTokenValidator::new(&config)
            .validate(&signed.token)
            .unwrap();
        assert_eq!(claims.claims.get(USER_ID_CLAIM), Some(user_id.to_string().as_str()));
        assert_eq!(claims.claims.get(USERNAME_CLAIM), Some("alice"));
        assert_eq!(claims.claims.get(TOKEN_ID_CLAIM), None);
        assert_eq!(signed.expires_at - signed.issued_at, 15 * 60);
    }

    #[test]
    fn test_refresh_token_carries_id_and_token_id_only() {
        let config = Arc::new(test_config());
        let user_id = Uuid::new_v4();

        let signed = RefreshTokenIssuer::new(config.clone())
            .issue(&user_id)
            .unwrap();

        let claims = RefreshTokenValidator::new(&config)
            .decode(&signed.token)
            .unwrap();
        assert_eq!(claims.claims.get(USER_ID_CLAIM), Some(user_id.to_string().as_str()));
        assert_eq!(claims.claims.get(USERNAME_CLAIM), None);
        assert!(claims.claims.get(TOKEN_ID_CLAIM).is_some());
        assert_eq!(signed.expires_at - signed.issued_at, 24 * 60 * 60);
    }

    #[test]
    fn test_refresh_tokens_for_same_user_differ() {
        let issuer = RefreshTokenIssuer::new(Arc::new(test_config()));
        let user_id = Uuid::new_v4();

        let first = issuer.issue(&user_id).unwrap();
        let second = issuer.issue(&user_id).unwrap();

        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_refresh_outlives_access() {
        let config = Arc::new(test_config());
        let user_id = Uuid::new_v4();

        let access = AccessTokenIssuer::new(config.clone())
            .issue(&user_id, "alice")
            .unwrap();
        let refresh = RefreshTokenIssuer::new(config).issue(&user_id).unwrap();

        assert!(refresh.expires_at > access.expires_at);
    }

    #[test]
    fn test_token_ids_are_url_safe() {
        let id = generate_token_id();
        assert_eq!(id.len(), 22);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
