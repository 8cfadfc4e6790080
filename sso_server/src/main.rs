//! Single sign-on server for the restaurant backend.
//!
//! Principals live in PostgreSQL, refresh sessions in Redis.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use restaurant_sso::{
    auth::{AuthManager, RegistrationManager},
    cache::RedisSessionCache,
    db::{Database, PgPrincipalRepository},
};
use sso_server::{api, config::ServerConfig, logging};
use tracing::info;

const HELP: &str = "\
Run the restaurant single sign-on server

USAGE:
  sso_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]
  --redis-url  URL         Session cache connection    [default: env REDIS_URL or redis://127.0.0.1:6379]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  REDIS_URL                Redis connection string
  JWT_SECRET               JWT signing secret (required, at least 32 chars)
  PASSWORD_PEPPER          Password hashing pepper (required, at least 16 chars)
  STAFF_SECRET_KEY         Secret for waiter and admin registration (required)
  ACCESS_TTL_SECS          Access token lifetime [default: 900]
  REFRESH_TTL_SECS         Refresh session lifetime [default: 604800]
  REQUEST_TIMEOUT_SECS     Per-request timeout [default: 10]
  (See .env file for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    redis_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        redis_url: pargs.opt_value_from_str("--redis-url")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url, args.redis_url)?;
    config.validate()?;
    info!("Starting single sign-on server at {}", config.bind);

    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected successfully");

    let cache = RedisSessionCache::connect(&config.redis_url)
        .await
        .context("Failed to connect to session cache")?;
    info!("Session cache connected successfully");

    let principals = Arc::new(PgPrincipalRepository::new(db.pool().clone()));
    let auth_manager = AuthManager::new(config.auth_config(), principals.clone(), Arc::new(cache));
    let registration = RegistrationManager::new(
        principals,
        config.security.password_pepper.clone(),
        config.security.staff_secret.clone(),
    );

    let state = api::AppState::new(auth_manager, registration)
        .with_request_timeout(config.request_timeout);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    db.close().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {e}");
        std::future::pending::<()>().await;
    }
}
