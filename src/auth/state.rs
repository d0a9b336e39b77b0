//! Authentication state trait and macro.

use crate::jwt::AccessTokenValidator;

/// Trait for state types that can verify bearer access tokens.
pub trait HasAuthBackend {
    fn access_tokens(&self) -> &AccessTokenValidator;
}

/// Implement `HasAuthBackend` for a state struct with an
/// `access_tokens: Arc<AccessTokenValidator>` field.
///
/// # Example
/// ```ignore
/// #[derive(Clone)]
/// pub struct MyState {
///     pub access_tokens: Arc<AccessTokenValidator>,
/// }
///
/// tokenmint::impl_has_auth_backend!(MyState);
/// ```
#[macro_export]
macro_rules! impl_has_auth_backend {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthBackend for $state_type {
            fn access_tokens(&self) -> &$crate::jwt::AccessTokenValidator {
                &self.access_tokens
            }
        }
    };
}
