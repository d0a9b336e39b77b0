#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use std::sync::Arc;
use tokenmint::config::{AuthenticationConfiguration, AuthenticationSettings};
use tokenmint::{ServerConfig, create_app, db::Database};
use tower::ServiceExt;

pub const ISSUER: &str = "https://tokenmint.test";
pub const AUDIENCE: &str = "https://api.tokenmint.test";
pub const ACCESS_SECRET: &[u8] = b"integration-access-secret-0123456789abcdef";
pub const REFRESH_SECRET: &[u8] = b"integration-refresh-secret-0123456789abcdef";

pub fn test_auth_config() -> Arc<AuthenticationConfiguration> {
    Arc::new(
        AuthenticationConfiguration::new(AuthenticationSettings {
            access_token_secret: ACCESS_SECRET.to_vec(),
            refresh_token_secret: REFRESH_SECRET.to_vec(),
            issuer: ISSUER.to_string(),
            audience: AUDIENCE.to_string(),
            access_token_expiration_minutes: 15,
            refresh_token_expiration_minutes: 60 * 24 * 14,
        })
        .expect("Invalid test configuration"),
    )
}

pub struct TestApp {
    pub app: Router,
    pub db: Database,
}

pub async fn create_test_app() -> TestApp {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        auth: test_auth_config(),
    };
    TestApp {
        app: create_app(&config),
        db,
    }
}

impl TestApp {
    /// Send a JSON request and return the status and parsed body (Null when empty).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        read_json(response).await
    }

    pub async fn register(&self, username: &str, password: &str) -> StatusCode {
        let (status, _) = self
            .send(
                "POST",
                "/api/authentication/register",
                Some(serde_json::json!({
                    "userName": username,
                    "email": format!("{}@example.com", username),
                    "password": password,
                    "confirmPassword": password,
                })),
                None,
            )
            .await;
        status
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            "POST",
            "/api/authentication/login",
            Some(serde_json::json!({ "userName": username, "password": password })),
            None,
        )
        .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            "POST",
            "/api/authentication/refresh",
            Some(serde_json::json!({ "refreshToken": refresh_token })),
            None,
        )
        .await
    }

    pub async fn logout(&self, access_token: Option<&str>) -> StatusCode {
        let (status, _) = self
            .send("DELETE", "/api/authentication/logout", None, access_token)
            .await;
        status
    }

    /// Register and log in, returning (access token, refresh token).
    pub async fn signed_in(&self, username: &str, password: &str) -> (String, String) {
        assert_eq!(self.register(username, password).await, StatusCode::NO_CONTENT);
        let (status, json) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK);
        (
            json["accessToken"].as_str().unwrap().to_string(),
            json["refreshToken"].as_str().unwrap().to_string(),
        )
    }

    pub async fn refresh_token_count(&self) -> i64 {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM refresh_tokens")
            .fetch_one(self.db.pool())
            .await
            .unwrap();
        count.0
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Decode a token's payload without verifying it.
pub fn payload(token: &str) -> serde_json::Value {
    let part = token.split('.').nth(1).expect("Token has no payload");
    let bytes = URL_SAFE_NO_PAD.decode(part).expect("Payload is not base64url");
    serde_json::from_slice(&bytes).expect("Payload is not JSON")
}
