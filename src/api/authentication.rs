//! Authentication API endpoints.
//!
//! - POST `/register` - Create an account
//! - POST `/login` - Exchange username and password for a token pair
//! - POST `/refresh` - Redeem a refresh token for a new pair (single use)
//! - DELETE `/logout` - Revoke every refresh token of the bearer

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::error::{ApiError, ResultExt, require_fields};
use crate::auth::{AuthenticationFlow, AuthenticationResponse, BearerAuth};
use crate::db::{TokenStore, UserStore};
use crate::impl_has_auth_backend;
use crate::jwt::AccessTokenValidator;
use crate::password::hash_password;
use crate::store::{StoreError, User, UserDirectory};

#[derive(Clone)]
pub struct AuthenticationState {
    pub flow: Arc<AuthenticationFlow<TokenStore, UserStore>>,
    pub access_tokens: Arc<AccessTokenValidator>,
}

impl_has_auth_backend!(AuthenticationState);

pub fn router(state: AuthenticationState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", delete(logout))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    user_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    user_name: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    refresh_token: Option<String>,
}

async fn register(
    State(state): State<AuthenticationState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let [username, email, password, confirm_password] = require_fields([
        ("UserName", request.user_name),
        ("Email", request.email),
        ("Password", request.password),
        ("ConfirmPassword", request.confirm_password),
    ])?;

    if password != confirm_password {
        return Err(ApiError::bad_request(
            "Password does not match confirm password.",
        ));
    }

    let users = state.flow.users();

    if users.find_by_email(&email).await.store_err()?.is_some() {
        return Err(ApiError::conflict("Email already exists."));
    }
    if users.find_by_username(&username).await.store_err()?.is_some() {
        return Err(ApiError::conflict("Username already exists."));
    }

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            ApiError::internal("Failed to hash password")
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to hash password");
            ApiError::internal("Failed to hash password")
        })?;

    let user = User {
        id: Uuid::new_v4(),
        username,
        email,
        password_hash,
    };

    match users.create(&user).await {
        Ok(()) => {}
        // Lost a race with a concurrent registration of the same name or email
        Err(StoreError::Conflict) => {
            return Err(ApiError::conflict("Username or email already exists."));
        }
        Err(e) => return Err(ApiError::Auth(e.into())),
    }

    info!(user_id = %user.id, username = %user.username, "User registered");
    Ok(StatusCode::NO_CONTENT)
}

async fn login(
    State(state): State<AuthenticationState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthenticationResponse>, ApiError> {
    let Json(request) = payload?;
    let [username, password] = require_fields([
        ("UserName", request.user_name),
        ("Password", request.password),
    ])?;

    let response = state.flow.login(&username, &password).await?;
    Ok(Json(response))
}

async fn refresh(
    State(state): State<AuthenticationState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AuthenticationResponse>, ApiError> {
    let Json(request) = payload?;
    let [refresh_token] = require_fields([("RefreshToken", request.refresh_token)])?;

    let response = state.flow.refresh(&refresh_token).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AuthenticationState>,
    BearerAuth(auth): BearerAuth,
) -> Result<impl IntoResponse, ApiError> {
    state.flow.logout(&auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
