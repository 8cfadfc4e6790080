//! Authentication module providing registration, login, and session management.
//!
//! This module implements:
//! - Argon2id password hashing with server-side pepper
//! - Stateless JWT access tokens (15-minute default expiry)
//! - Revocable refresh tokens backed by cache sessions (7-day default expiry)
//! - Registration for customers and secret-gated staff accounts
//!
//! Failure modes are deliberately coarse: an unknown identifier and a wrong
//! password are both [`AuthError::InvalidCredentials`], and every refresh
//! token problem (bad signature, expired, revoked) is [`AuthError::InvalidToken`].
//!
//! ## Example
//!
//! ```no_run
//! use restaurant_sso::auth::{AuthConfig, AuthManager, Role};
//! use restaurant_sso::cache::RedisSessionCache;
//! use restaurant_sso::db::{Database, DatabaseConfig, PgPrincipalRepository};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::default()).await?;
//!     let cache = RedisSessionCache::connect("redis://localhost:6379").await?;
//!     let auth = AuthManager::new(
//!         AuthConfig::new("jwt_secret", "pepper"),
//!         Arc::new(PgPrincipalRepository::new(db.pool().clone())),
//!         Arc::new(cache),
//!     );
//!
//!     let tokens = auth.login(Role::Waiter, "bob", "password").await?;
//!     println!("access token: {}", tokens.access_token);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod manager;
pub mod models;
pub mod password;
pub mod register;
pub mod sessions;
pub mod tokens;

pub use config::AuthConfig;
pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{
    AccessPrincipal, AccessTokenClaims, HealthStatus, Principal, PrincipalId, RefreshSession,
    RefreshTokenClaims, RegisterAdminRequest, RegisterCustomerRequest, RegisterWaiterRequest,
    Role, TokenPair, UnknownRole,
};
pub use password::PasswordHasher;
pub use register::RegistrationManager;
pub use sessions::{SessionStore, session_key};
pub use tokens::{AccessTokenIssuer, RefreshTokenCodec, TokenVerifier};
