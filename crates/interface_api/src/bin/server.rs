//! Payment API - Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin payment-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin payment-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_FORMAT` - `text` or `json` (default: text)
//! * `API_BOOTSTRAP_USER_EMAIL` / `API_BOOTSTRAP_USER_PASSWORD` - user created at start-up

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::UserId;
use domain_identity::{NewUser, UserPort};
use infra_db::{connect, DatabaseConfig, PostgresBillAdapter, PostgresUserAdapter};
use interface_api::config::{ApiConfig, BootstrapUser};
use interface_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;

    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Payment API Server"
    );

    let db_config =
        DatabaseConfig::new(config.database_url.clone()).max_connections(config.db_max_connections);
    let pool = connect(&db_config)
        .await
        .context("failed to prepare the database")?;

    let users: Arc<dyn UserPort> = Arc::new(PostgresUserAdapter::new(pool.clone()));
    if let Some(bootstrap) = config.bootstrap_user() {
        ensure_user(users.as_ref(), bootstrap).await?;
    }

    let addr: SocketAddr = config.server_addr().parse()?;
    let state = AppState::new(Arc::new(PostgresBillAdapter::new(pool)), users, config);
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Creates the start-up user unless the email is already registered
async fn ensure_user(users: &dyn UserPort, bootstrap: BootstrapUser) -> anyhow::Result<()> {
    if users.find_by_email(&bootstrap.email).await?.is_some() {
        tracing::debug!("Bootstrap user already present");
        return Ok(());
    }

    let user = NewUser::new(bootstrap.name, bootstrap.email, bootstrap.password)
        .into_user(UserId::new_v7())?;
    let user = users.create_user(user).await?;
    tracing::info!(user_id = %user.id, "Bootstrap user created");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
