//! Signed claims tokens (HS256 JWTs).
//!
//! Access and refresh tokens share one wire format and differ only in the
//! secret that signs them and the claims they carry. There is no "type"
//! claim, so each context must use the validator for its own secret.

mod issuers;
mod signer;
mod validator;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ConfigurationError;

pub use issuers::{
    AccessTokenIssuer, RefreshTokenIssuer, TOKEN_ID_CLAIM, USER_ID_CLAIM, USERNAME_CLAIM,
};
pub use signer::{SignedToken, TokenSigner};
pub use validator::{AccessTokenValidator, RefreshTokenValidator, TokenVerifier};

/// Claim names set by the signer itself. Custom claims may not use them.
pub const RESERVED_CLAIMS: &[&str] = &["iss", "aud", "iat", "exp", "nbf"];

/// Custom claims carried by a token, ordered and unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(BTreeMap<String, String>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim, replacing any earlier value with the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a claim. Returns the previous value if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Full token payload: registered claims plus the custom claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    #[serde(flatten)]
    pub claims: ClaimSet,
}

/// Current Unix time in seconds.
pub(crate) fn now_secs() -> Result<u64, JwtError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| JwtError::TimeError)
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Signing key rejected
    Configuration(ConfigurationError),
    /// A custom claim uses a registered claim name
    ReservedClaim(String),
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Error decoding or validating the token
    Decoding(jsonwebtoken::errors::Error),
    /// The token's expiry is not after the current second
    Expired,
    /// System time error
    TimeError,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Configuration(e) => write!(f, "Invalid signing configuration: {}", e),
            JwtError::ReservedClaim(name) => write!(f, "Claim name '{}' is reserved", name),
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::Expired => write!(f, "Token has expired"),
            JwtError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}

impl From<ConfigurationError> for JwtError {
    fn from(e: ConfigurationError) -> Self {
        JwtError::Configuration(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_names_are_unique() {
        let mut claims = ClaimSet::new().with("id", "first");
        let previous = claims.insert("id", "second");

        assert_eq!(previous.as_deref(), Some("first"));
        assert_eq!(claims.len(), 1);
        assert_eq!(claims.get("id"), Some("second"));
    }

    #[test]
    fn test_claims_are_ordered_by_name() {
        let claims = ClaimSet::new()
            .with("username", "alice")
            .with("id", "42")
            .with("jti", "abc");

        let names: Vec<&str> = claims.names().collect();
        assert_eq!(names, vec!["id", "jti", "username"]);
    }

    #[test]
    fn test_payload_flattens_custom_claims() {
        let payload = TokenClaims {
            iss: "issuer".to_string(),
            aud: "audience".to_string(),
            iat: 10,
            exp: 20,
            claims: ClaimSet::new().with("id", "42"),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["exp"], 20);

        let parsed: TokenClaims = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, payload);
    }
}
