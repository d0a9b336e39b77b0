use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokenmint::cli::{
    ACCESS_TOKEN_SECRET_ENV, Args, REFRESH_TOKEN_SECRET_ENV, build_config, init_logging,
    load_secret, open_database,
};
use tokenmint::cleanup::run_cleanup;
use tokenmint::{ServerConfig, create_app};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(access_token_secret) = load_secret(
        ACCESS_TOKEN_SECRET_ENV,
        args.access_token_secret_file.as_deref(),
    ) else {
        std::process::exit(1);
    };
    let Some(refresh_token_secret) = load_secret(
        REFRESH_TOKEN_SECRET_ENV,
        args.refresh_token_secret_file.as_deref(),
    ) else {
        std::process::exit(1);
    };

    let auth = match build_config(&args, access_token_secret, refresh_token_secret) {
        Ok(auth) => Arc::new(auth),
        Err(e) => {
            error!(error = %e, "Invalid authentication configuration");
            std::process::exit(1);
        }
    };

    let timeout = Duration::from_secs(args.store_timeout_secs);
    let Some(db) = open_database(&args.database, timeout).await else {
        std::process::exit(1);
    };

    if args.purge_expired {
        run_cleanup(&db).await;
    }

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let config = ServerConfig { db, auth };
    let app = create_app(&config);

    match listener.local_addr() {
        Ok(local_addr) => info!(address = %local_addr, "Listening"),
        Err(_) => info!(address = %addr, "Listening"),
    }

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
