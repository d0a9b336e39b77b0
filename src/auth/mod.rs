//! Refresh/access token authentication.
//!
//! Short-lived access tokens are stateless and verified by signature alone.
//! Long-lived refresh tokens are recorded in the store, single-use, and
//! rotated on every refresh. Logout revokes every refresh token of a user.

mod authenticator;
mod bearer;
mod errors;
mod extractors;
mod flow;
mod state;
mod types;

pub use authenticator::Authenticator;
pub use bearer::get_bearer_token;
pub use errors::{ApiAuthError, AuthError, AuthErrorKind};
pub use extractors::BearerAuth;
pub use flow::AuthenticationFlow;
pub use state::HasAuthBackend;
pub use types::{AuthenticatedUser, AuthenticationResponse};
