mod authentication;
mod error;

use axum::Router;
use std::sync::Arc;

use crate::auth::AuthenticationFlow;
use crate::config::AuthenticationConfiguration;
use crate::db::Database;
use crate::jwt::AccessTokenValidator;

pub use authentication::AuthenticationState;
pub use error::{ApiError, ErrorResponse};

/// Create the API router.
pub fn create_api_router(db: Database, config: Arc<AuthenticationConfiguration>) -> Router {
    let authentication_state = AuthenticationState {
        access_tokens: Arc::new(AccessTokenValidator::new(&config)),
        flow: Arc::new(AuthenticationFlow::new(config, db.tokens(), db.users())),
    };

    Router::new().nest(
        "/authentication",
        authentication::router(authentication_state),
    )
}
