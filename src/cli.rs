//! CLI argument parsing, validation, and startup helpers.

use crate::config::{AuthenticationConfiguration, AuthenticationSettings, ConfigurationError};
use crate::db::Database;
use clap::Parser;
use std::time::Duration;
use tracing::{error, info};

/// Environment variable holding the access token secret.
pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";

/// Environment variable holding the refresh token secret.
pub const REFRESH_TOKEN_SECRET_ENV: &str = "REFRESH_TOKEN_SECRET";

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tokenmint",
    about = "Access and refresh token issuance with single-use refresh rotation"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "7291")]
    pub port: u16,

    /// Path to SQLite database file (":memory:" for a throwaway database)
    #[arg(short, long, default_value = "tokenmint.db")]
    pub database: String,

    /// Path to file containing the access token secret. Prefer the ACCESS_TOKEN_SECRET env var
    #[arg(long)]
    pub access_token_secret_file: Option<String>,

    /// Path to file containing the refresh token secret. Prefer the REFRESH_TOKEN_SECRET env var
    #[arg(long)]
    pub refresh_token_secret_file: Option<String>,

    /// Token issuer (`iss` claim)
    #[arg(long, env = "AUTH_ISSUER", default_value = "")]
    pub issuer: String,

    /// Token audience (`aud` claim)
    #[arg(long, env = "AUTH_AUDIENCE", default_value = "")]
    pub audience: String,

    /// Access token lifetime in minutes
    #[arg(long, env = "ACCESS_TOKEN_EXPIRATION_MINUTES", default_value = "15")]
    pub access_token_expiration_minutes: u64,

    /// Refresh token lifetime in minutes (default 14 days)
    #[arg(long, env = "REFRESH_TOKEN_EXPIRATION_MINUTES", default_value = "20160")]
    pub refresh_token_expiration_minutes: u64,

    /// Seconds to wait for a database connection or lock before failing the request
    #[arg(long, default_value = "5")]
    pub store_timeout_secs: u64,

    /// Delete expired refresh tokens once at startup
    #[arg(long)]
    pub purge_expired: bool,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load a secret from an environment variable or a file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_secret(env_var: &str, secret_file: Option<&str>) -> Option<Vec<u8>> {
    if let Ok(secret) = std::env::var(env_var) {
        // Clear the environment variable to prevent leaking
        // SAFETY: called during startup before any other code reads the
        // environment, and nothing reads this variable afterwards.
        unsafe { std::env::remove_var(env_var) };
        return Some(secret.into_bytes());
    }

    match secret_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => Some(content.trim().as_bytes().to_vec()),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read secret file");
                None
            }
        },
        None => {
            error!(
                "Secret is required. Set the {} environment variable (recommended) or use the matching --*-secret-file option",
                env_var
            );
            None
        }
    }
}

/// Validate the token settings from arguments and loaded secrets.
pub fn build_config(
    args: &Args,
    access_token_secret: Vec<u8>,
    refresh_token_secret: Vec<u8>,
) -> Result<AuthenticationConfiguration, ConfigurationError> {
    AuthenticationConfiguration::new(AuthenticationSettings {
        access_token_secret,
        refresh_token_secret,
        issuer: args.issuer.clone(),
        audience: args.audience.clone(),
        access_token_expiration_minutes: args.access_token_expiration_minutes,
        refresh_token_expiration_minutes: args.refresh_token_expiration_minutes,
    })
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str, timeout: Duration) -> Option<Database> {
    match Database::open_with_timeout(path, timeout).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
