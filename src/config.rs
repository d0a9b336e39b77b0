//! Authentication configuration.
//!
//! Built once at startup, validated, then shared read-only behind an `Arc`
//! by every issuer, validator and the authenticator.

/// Minimum secret length in bytes for HMAC-SHA-256 signing keys.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime: ten years, in minutes.
pub const MAX_EXPIRATION_MINUTES: u64 = 10 * 365 * 24 * 60;

/// Signing secrets, issuer, audience and token lifetimes.
#[derive(Clone)]
pub struct AuthenticationConfiguration {
    access_token_secret: Vec<u8>,
    refresh_token_secret: Vec<u8>,
    issuer: String,
    audience: String,
    access_token_expiration_minutes: u64,
    refresh_token_expiration_minutes: u64,
}

/// Raw configuration values, before validation.
#[derive(Debug, Clone)]
pub struct AuthenticationSettings {
    pub access_token_secret: Vec<u8>,
    pub refresh_token_secret: Vec<u8>,
    pub issuer: String,
    pub audience: String,
    pub access_token_expiration_minutes: u64,
    pub refresh_token_expiration_minutes: u64,
}

impl AuthenticationConfiguration {
    /// Validate the settings and build an immutable configuration.
    pub fn new(settings: AuthenticationSettings) -> Result<Self, ConfigurationError> {
        check_secret("access token", &settings.access_token_secret)?;
        check_secret("refresh token", &settings.refresh_token_secret)?;

        if settings.access_token_secret == settings.refresh_token_secret {
            return Err(ConfigurationError::SharedSecret);
        }
        if settings.issuer.trim().is_empty() {
            return Err(ConfigurationError::MissingValue("issuer"));
        }
        if settings.audience.trim().is_empty() {
            return Err(ConfigurationError::MissingValue("audience"));
        }
        if settings.access_token_expiration_minutes == 0 {
            return Err(ConfigurationError::ZeroLifetime("access token"));
        }
        if settings.refresh_token_expiration_minutes == 0 {
            return Err(ConfigurationError::ZeroLifetime("refresh token"));
        }
        if settings.access_token_expiration_minutes > MAX_EXPIRATION_MINUTES {
            return Err(ConfigurationError::LifetimeTooLong("access token"));
        }
        if settings.refresh_token_expiration_minutes > MAX_EXPIRATION_MINUTES {
            return Err(ConfigurationError::LifetimeTooLong("refresh token"));
        }
        if settings.refresh_token_expiration_minutes <= settings.access_token_expiration_minutes {
            return Err(ConfigurationError::RefreshNotLongerThanAccess);
        }

        Ok(Self {
            access_token_secret: settings.access_token_secret,
            refresh_token_secret: settings.refresh_token_secret,
            issuer: settings.issuer,
            audience: settings.audience,
            access_token_expiration_minutes: settings.access_token_expiration_minutes,
            refresh_token_expiration_minutes: settings.refresh_token_expiration_minutes,
        })
    }

    pub fn access_token_secret(&self) -> &[u8] {
        &self.access_token_secret
    }

    pub fn refresh_token_secret(&self) -> &[u8] {
        &self.refresh_token_secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn access_token_expiration_minutes(&self) -> u64 {
        self.access_token_expiration_minutes
    }

    pub fn refresh_token_expiration_minutes(&self) -> u64 {
        self.refresh_token_expiration_minutes
    }
}

impl std::fmt::Debug for AuthenticationConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationConfiguration")
            .field("access_token_secret", &"[REDACTED]")
            .field("refresh_token_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field(
                "access_token_expiration_minutes",
                &self.access_token_expiration_minutes,
            )
            .field(
                "refresh_token_expiration_minutes",
                &self.refresh_token_expiration_minutes,
            )
            .finish()
    }
}

/// Check that a signing secret satisfies the HMAC-SHA-256 key-size minimum.
pub fn check_secret(name: &'static str, secret: &[u8]) -> Result<(), ConfigurationError> {
    if secret.is_empty() {
        return Err(ConfigurationError::EmptySecret(name));
    }
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigurationError::SecretTooShort {
            name,
            length: secret.len(),
        });
    }
    Ok(())
}

/// Invalid authentication configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A signing secret is empty
    EmptySecret(&'static str),
    /// A signing secret is shorter than `MIN_SECRET_LENGTH`
    SecretTooShort { name: &'static str, length: usize },
    /// Access and refresh tokens would be signed with the same secret
    SharedSecret,
    /// A required value is empty
    MissingValue(&'static str),
    /// A token lifetime is zero minutes
    ZeroLifetime(&'static str),
    /// A token lifetime exceeds `MAX_EXPIRATION_MINUTES`
    LifetimeTooLong(&'static str),
    /// Refresh tokens must outlive access tokens
    RefreshNotLongerThanAccess,
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::EmptySecret(name) => write!(f, "The {} secret is empty", name),
            ConfigurationError::SecretTooShort { name, length } => write!(
                f,
                "The {} secret is {} bytes, at least {} are required",
                name, length, MIN_SECRET_LENGTH
            ),
            ConfigurationError::SharedSecret => write!(
                f,
                "Access and refresh tokens must use different secrets"
            ),
            ConfigurationError::MissingValue(name) => write!(f, "The {} must not be empty", name),
            ConfigurationError::ZeroLifetime(name) => {
                write!(f, "The {} lifetime must be at least one minute", name)
            }
            ConfigurationError::LifetimeTooLong(name) => write!(
                f,
                "The {} lifetime must not exceed {} minutes",
                name, MAX_EXPIRATION_MINUTES
            ),
            ConfigurationError::RefreshNotLongerThanAccess => write!(
                f,
                "Refresh tokens must expire later than access tokens"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}
