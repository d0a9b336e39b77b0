//! Shared error handling for API endpoints.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::store::StoreError;

/// JSON error body: `{"errorMessages": ["..."]}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_messages: Vec<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_messages: vec![message.into()],
        }
    }

    pub fn many(messages: Vec<String>) -> Self {
        Self {
            error_messages: messages,
        }
    }
}

/// Extension trait for concise error mapping on store Results.
pub trait ResultExt<T> {
    fn store_err(self) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T, StoreError> {
    fn store_err(self) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::Auth(AuthError::from(e)))
    }
}

/// API error type with automatic response conversion.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(Vec<String>),
    Conflict(String),
    Internal(String),
    Auth(AuthError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(vec![msg.into()])
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(vec![rejection.body_text()])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(messages) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::many(messages))
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::new(msg)),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(msg))
            }
            ApiError::Auth(e) => return e.into_response(),
        };
        (status, Json(body)).into_response()
    }
}

/// Unwrap required fields in order, or collect a message for every one that
/// is missing or blank.
pub fn require_fields<const N: usize>(
    fields: [(&str, Option<String>); N],
) -> Result<[String; N], ApiError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| format!("The {} field is required.", name))
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::BadRequest(missing));
    }
    Ok(fields.map(|(_, value)| value.unwrap_or_default()))
}
