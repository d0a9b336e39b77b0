//! Authentication error types.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::api::ErrorResponse;
use crate::store::StoreError;

/// Outcome of a failed login, refresh or logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password
    InvalidCredentials,
    /// Refresh token malformed, forged, expired, unknown or already used
    InvalidOrExpiredToken,
    /// The refresh token's owner no longer exists
    UserNotFound,
    /// Token string collided with a stored one twice in a row
    Conflict,
    StoreUnavailable(String),
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Conflict | AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Never includes internal detail.
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid username or password.",
            AuthError::InvalidOrExpiredToken => "Invalid refresh token.",
            AuthError::UserNotFound => "User not found.",
            AuthError::Conflict | AuthError::StoreUnavailable(_) => {
                "Service temporarily unavailable."
            }
            AuthError::Internal(_) => "Internal server error.",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::InvalidOrExpiredToken => write!(f, "Invalid or expired refresh token"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::Conflict => write!(f, "Refresh token collided with an existing token"),
            AuthError::StoreUnavailable(reason) => write!(f, "Store unavailable: {}", reason),
            AuthError::Internal(reason) => write!(f, "Internal error: {}", reason),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => AuthError::Conflict,
            StoreError::Unavailable(reason) => AuthError::StoreUnavailable(reason),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.message()))).into_response()
    }
}

/// Why a bearer access token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    NotAuthenticated,
    InvalidToken,
}

/// Rejection from the bearer extractor (401 with a `WWW-Authenticate` challenge).
#[derive(Debug)]
pub struct ApiAuthError {
    pub(super) kind: AuthErrorKind,
}

impl ApiAuthError {
    pub(super) fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    fn message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::NotAuthenticated => "Not authenticated.",
            AuthErrorKind::InvalidToken => "Invalid or expired access token.",
        }
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        let mut response = (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(self.message())),
        )
            .into_response();

        let challenge = match self.kind {
            AuthErrorKind::NotAuthenticated => "Bearer",
            AuthErrorKind::InvalidToken => "Bearer error=\"invalid_token\"",
        };
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));

        response
    }
}
