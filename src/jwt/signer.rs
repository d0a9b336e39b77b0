//! Builds and signs compact claims tokens.

use jsonwebtoken::{Algorithm, EncodingKey, Header};

use super::{ClaimSet, JwtError, RESERVED_CLAIMS, TokenClaims, now_secs};
use crate::config::check_secret;

/// A freshly signed token and the timestamps embedded in it.
#[derive(Debug, Clone)]
pub struct SignedToken {
    /// The JWT string (`header.payload.signature`, base64url)
    pub token: String,
    /// Issued at timestamp (Unix seconds)
    pub issued_at: u64,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: u64,
}

/// Stateless HS256 signer. Holds no keys; every call supplies its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSigner;

impl TokenSigner {
    pub fn new() -> Self {
        Self
    }

    /// Sign a token issued now and expiring `expiration_minutes` from now.
    pub fn sign(
        &self,
        secret_key: &[u8],
        issuer: &str,
        audience: &str,
        expiration_minutes: u64,
        claims: &ClaimSet,
    ) -> Result<SignedToken, JwtError> {
        let now = now_secs()?;
        self.sign_at(now, secret_key, issuer, audience, expiration_minutes, claims)
    }

    /// Sign a token with an explicit issue time.
    pub(crate) fn sign_at(
        &self,
        issued_at: u64,
        secret_key: &[u8],
        issuer: &str,
        audience: &str,
        expiration_minutes: u64,
        claims: &ClaimSet,
    ) -> Result<SignedToken, JwtError> {
        check_secret("signing", secret_key)?;

        if let Some(name) = claims.names().find(|name| RESERVED_CLAIMS.contains(name)) {
            return Err(JwtError::ReservedClaim(name.to_string()));
        }

        let expires_at = issued_at.saturating_add(expiration_minutes.saturating_mul(60));

        let payload = TokenClaims {
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: issued_at,
            exp: expires_at,
            claims: claims.clone(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(secret_key),
        )
        .map_err(JwtError::Encoding)?;

        Ok(SignedToken {
            token,
            issued_at,
            expires_at,
        })
    }
}
