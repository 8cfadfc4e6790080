//! # Restaurant SSO
//!
//! Authentication for the restaurant backend: customers, waiters and
//! administrators log in with a password and receive a pair of signed tokens.
//!
//! ## Token lifecycle
//!
//! - **Access tokens** are short-lived HS256 JWTs carrying the principal id
//!   (`sub`) and role (`aud`). They are never stored server-side.
//! - **Refresh tokens** are long-lived HS256 JWTs whose subject is an opaque
//!   session id. The session itself lives in a cache (Redis in production)
//!   with a TTL equal to the token lifetime, which is what makes logout
//!   possible for an otherwise stateless token.
//!
//! ## Core Modules
//!
//! - [`auth`]: password hashing, token issuing/verification, sessions and the
//!   login/refresh/logout orchestration
//! - [`cache`]: key/value session cache backends (Redis, in-memory)
//! - [`db`]: principal storage (PostgreSQL, in-memory)
//!
//! ## Example
//!
//! ```
//! use restaurant_sso::auth::{AuthConfig, AuthManager, PasswordHasher, Role};
//! use restaurant_sso::cache::MemorySessionCache;
//! use restaurant_sso::db::InMemoryPrincipalRepository;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::new("a-very-long-secret-used-only-for-docs", "pepper");
//! let hasher = PasswordHasher::new(config.password_pepper.clone());
//!
//! let principals = Arc::new(InMemoryPrincipalRepository::new());
//! principals.insert_customer("a@b.com", &hasher.hash("p1")?).await;
//!
//! let auth = AuthManager::new(config, principals, Arc::new(MemorySessionCache::new()));
//! let pair = auth.login(Role::Customer, "a@b.com", "p1").await?;
//! let access = auth.refresh(&pair.refresh_token).await?;
//! auth.logout(&pair.refresh_token).await;
//! # let _ = access;
//! # Ok(())
//! # }
//! ```

/// Authentication, tokens and sessions.
pub mod auth;

/// Session cache backends.
pub mod cache;

/// Principal storage.
pub mod db;

pub use auth::{AuthError, AuthManager, AuthResult, Role, TokenPair};
