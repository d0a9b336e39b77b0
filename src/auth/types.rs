//! Authentication result types.

use serde::Serialize;
use uuid::Uuid;

/// Token pair returned on login and on refresh. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Caller identity taken from a verified bearer access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID from the `id` claim
    pub user_id: Uuid,
}
