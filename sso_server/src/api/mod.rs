//! HTTP API for the single sign-on service.
//!
//! # Modules
//!
//! - [`auth`]: Login, token refresh, logout and token introspection
//! - [`register`]: Customer, waiter and admin registration
//! - [`middleware`]: Bearer-token authentication and request timeouts
//! - [`request_id`]: Request correlation ids
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                         - Health check (public)
//! POST /api/v1/auth/login              - Login (public)
//! POST /api/v1/auth/refresh            - New access token from a refresh token (public)
//! POST /api/v1/auth/logout             - Revoke a refresh token (public)
//! GET  /api/v1/auth/me                 - Identity behind an access token (auth required)
//! POST /api/v1/register/customer       - Register customer (public)
//! POST /api/v1/register/waiter         - Register waiter (staff secret)
//! POST /api/v1/register/admin          - Register admin (staff secret)
//! ```
//!
//! Refresh and logout authenticate with the refresh token in the body, so
//! they sit outside the bearer-token middleware.
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod auth;
pub mod middleware;
pub mod register;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use restaurant_sso::auth::{AuthManager, RegistrationManager};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tower_http::cors::CorsLayer;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the managers sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub registration: Arc<RegistrationManager>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(auth_manager: AuthManager, registration: RegistrationManager) -> Self {
        Self {
            auth_manager: Arc::new(auth_manager),
            registration: Arc::new(registration),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use sso_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout_middleware,
        ))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API v1 router
fn create_v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/register/customer", post(register::register_customer))
        .route("/register/waiter", post(register::register_waiter))
        .route("/register/admin", post(register::register_admin));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when both the principal store and the session cache
/// answer a ping, `503 Service Unavailable` otherwise.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","database":true,"cache":true,"version":"0.1.0","timestamp":"2026-10-19T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.auth_manager.health_check().await;
    let healthy = health.is_healthy();

    let status_code = if healthy {
        StatusCode::OK
    } else {
        tracing::warn!(
            database = health.database,
            cache = health.cache,
            "health check failed"
        );
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": health.database,
        "cache": health.cache,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
