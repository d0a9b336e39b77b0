//! Tests for startup validation (secrets, issuer/audience, lifetimes) and server bootstrap.

mod common;

use std::process::{Command, Output, Stdio};
use tokenmint::{ServerConfig, db::Database, start_server};

const ACCESS: &str = "startup-access-secret-0123456789abcdef";
const REFRESH: &str = "startup-refresh-secret-0123456789abcdef";

fn run(envs: &[(&str, &str)], args: &[&str]) -> (Output, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tokenmint"));
    for var in [
        "ACCESS_TOKEN_SECRET",
        "REFRESH_TOKEN_SECRET",
        "AUTH_ISSUER",
        "AUTH_AUDIENCE",
        "ACCESS_TOKEN_EXPIRATION_MINUTES",
        "REFRESH_TOKEN_EXPIRATION_MINUTES",
    ] {
        command.env_remove(var);
    }
    let output = command
        .envs(envs.iter().copied())
        .args(["--database", ":memory:"])
        .args(args)
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run binary");

    // tracing logs to stdout by default
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output, combined)
}

#[test]
fn test_missing_access_secret_exits_with_error() {
    let (output, logs) = run(&[("REFRESH_TOKEN_SECRET", REFRESH)], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        logs.contains("ACCESS_TOKEN_SECRET"),
        "Should mention ACCESS_TOKEN_SECRET, got: {}",
        logs
    );
}

#[test]
fn test_short_secret_exits_with_error() {
    let (output, logs) = run(
        &[
            ("ACCESS_TOKEN_SECRET", "too-short"),
            ("REFRESH_TOKEN_SECRET", REFRESH),
            ("AUTH_ISSUER", "https://issuer.test"),
            ("AUTH_AUDIENCE", "https://api.test"),
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(logs.contains("at least 32"), "got: {}", logs);
}

#[test]
fn test_shared_secret_exits_with_error() {
    let (output, logs) = run(
        &[
            ("ACCESS_TOKEN_SECRET", ACCESS),
            ("REFRESH_TOKEN_SECRET", ACCESS),
            ("AUTH_ISSUER", "https://issuer.test"),
            ("AUTH_AUDIENCE", "https://api.test"),
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(logs.contains("different secrets"), "got: {}", logs);
}

#[test]
fn test_missing_issuer_exits_with_error() {
    let (output, logs) = run(
        &[
            ("ACCESS_TOKEN_SECRET", ACCESS),
            ("REFRESH_TOKEN_SECRET", REFRESH),
            ("AUTH_AUDIENCE", "https://api.test"),
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(logs.contains("issuer"), "got: {}", logs);
}

#[test]
fn test_refresh_lifetime_must_exceed_access_lifetime() {
    let (output, logs) = run(
        &[
            ("ACCESS_TOKEN_SECRET", ACCESS),
            ("REFRESH_TOKEN_SECRET", REFRESH),
        ],
        &[
            "--issuer",
            "https://issuer.test",
            "--audience",
            "https://api.test",
            "--access-token-expiration-minutes",
            "30",
            "--refresh-token-expiration-minutes",
            "30",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(logs.contains("expire later"), "got: {}", logs);
}

#[tokio::test]
async fn test_start_server_binds_random_port() {
    let db = Database::open(":memory:").await.unwrap();
    let config = ServerConfig {
        db,
        auth: common::test_auth_config(),
    };

    let (handle, addr) = start_server(config, 0).await.unwrap();

    assert_ne!(addr.port(), 0);
    tokio::net::TcpStream::connect(addr)
        .await
        .expect("Server should accept connections");
    handle.abort();
}
