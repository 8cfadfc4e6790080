//! Authentication error types.

use thiserror::Error;

use super::models::Role;
use crate::cache::CacheError;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier or wrong password. The two are never told apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bad signature, expired token, or missing/expired session
    #[error("Invalid token")]
    InvalidToken,

    /// Staff registration secret did not match
    #[error("Invalid secret token")]
    InvalidSecretToken,

    /// Email or login already registered for this role
    #[error("{0} already exists")]
    AlreadyExists(Role),

    /// Malformed registration input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session cache error
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// JWT signing error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Configured token lifetime does not fit a timestamp
    #[error("Token lifetime out of range")]
    TtlOutOfRange,

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Session record in the cache could not be decoded
    #[error("Corrupt session record: {0}")]
    CorruptSession(#[from] serde_json::Error),
}

impl AuthError {
    /// Whether the error comes from infrastructure rather than caller input.
    ///
    /// Internal errors are retryable by the caller.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Database(_)
                | AuthError::Cache(_)
                | AuthError::Jwt(_)
                | AuthError::HashingFailed
                | AuthError::TtlOutOfRange
                | AuthError::CorruptSession(_)
        )
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Infrastructure errors are collapsed into a single message so that
    /// storage, cache and signing details never reach the caller.
    pub fn client_message(&self) -> String {
        if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
