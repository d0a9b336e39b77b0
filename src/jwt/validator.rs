//! Token verification: signature, issuer, audience and expiry.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use tracing::debug;

use super::{JwtError, TokenClaims, now_secs};
use crate::config::AuthenticationConfiguration;

/// HS256 verifier bound to one secret, issuer and audience.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8], issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify and decode a token. The current second must be strictly before `exp`.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, JwtError> {
        let claims =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
                .map(|data| data.claims)
                .map_err(JwtError::Decoding)?;

        // jsonwebtoken still accepts exp == now
        if claims.exp <= now_secs()? {
            return Err(JwtError::Expired);
        }
        Ok(claims)
    }
}

/// Verifies refresh tokens against the refresh-token secret.
#[derive(Clone)]
pub struct RefreshTokenValidator {
    verifier: TokenVerifier,
}

impl RefreshTokenValidator {
    pub fn new(config: &AuthenticationConfiguration) -> Self {
        Self {
            verifier: TokenVerifier::new(
                config.refresh_token_secret(),
                config.issuer(),
                config.audience(),
            ),
        }
    }

    /// Whether the token is well-formed, correctly signed, from the configured
    /// issuer for the configured audience, and not yet expired.
    ///
    /// Every failure collapses to `false`; the cause is only logged.
    pub fn validate(&self, token: &str) -> bool {
        match self.verifier.verify(token) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Refresh token rejected");
                false
            }
        }
    }

    /// Verify and return the claims of a refresh token.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.verifier.verify(token)
    }
}

/// Verifies bearer access tokens against the access-token secret.
#[derive(Clone)]
pub struct AccessTokenValidator {
    verifier: TokenVerifier,
}

impl AccessTokenValidator {
    pub fn new(config: &AuthenticationConfiguration) -> Self {
        Self {
            verifier: TokenVerifier::new(
                config.access_token_secret(),
                config.issuer(),
                config.audience(),
            ),
        }
    }

    pub fn validate(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.verifier.verify(token)
    }
}
