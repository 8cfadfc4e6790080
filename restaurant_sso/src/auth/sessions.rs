//! Refresh sessions stored in the cache.
//!
//! A refresh token is valid only while all three hold:
//! 1. its signature verifies,
//! 2. its own `exp` has not passed,
//! 3. the session it names is still in the cache and the session's
//!    `expires_at` has not passed.
//!
//! The cache TTL is the primary expiry; the stored `expires_at` guards
//! against a backend that does not honor TTLs.

use chrono::Utc;
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

use super::{
    errors::{AuthError, AuthResult},
    models::{AccessPrincipal, PrincipalId, RefreshSession, Role},
    tokens::{RefreshTokenCodec, expiry},
};
use crate::cache::SessionCache;

/// Cache key for a session id
pub fn session_key(session_id: &Uuid) -> String {
    format!("refresh_token:{session_id}")
}

/// Creates, checks and revokes refresh sessions
#[derive(Clone)]
pub struct SessionStore {
    cache: Arc<dyn SessionCache>,
    codec: RefreshTokenCodec,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(cache: Arc<dyn SessionCache>, secret: &str, ttl: Duration) -> Self {
        Self {
            cache,
            codec: RefreshTokenCodec::new(secret),
            ttl,
        }
    }

    /// Open a new session and return the refresh token wrapping it.
    ///
    /// The token is only returned once the session write has succeeded.
    pub async fn issue_refresh(&self, principal_id: PrincipalId, role: Role) -> AuthResult<String> {
        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = expiry(now, self.ttl)?;

        let token = self.codec.seal(session_id, now, expires_at)?;

        let record = serde_json::to_string(&RefreshSession {
            principal_id,
            role,
            expires_at,
        })?;
        self.cache
            .set(&session_key(&session_id), &record, self.ttl)
            .await?;

        Ok(token)
    }

    /// Resolve a refresh token to the identity stored in its session.
    ///
    /// The identity always comes from the stored record, never from the token.
    pub async fn verify_refresh(&self, token: &str) -> AuthResult<AccessPrincipal> {
        let session_id = self.codec.open(token)?;

        let Some(raw) = self.cache.get(&session_key(&session_id)).await? else {
            return Err(AuthError::InvalidToken);
        };
        let session: RefreshSession = serde_json::from_str(&raw)?;

        // Stale entries are left for the backend to evict
        if session.expires_at <= Utc::now() {
            return Err(AuthError::InvalidToken);
        }

        Ok(AccessPrincipal {
            principal_id: session.principal_id,
            role: session.role,
        })
    }

    /// Delete the session behind a refresh token.
    ///
    /// A token that fails verification is a no-op; deleting a session that no
    /// longer exists succeeds.
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        let Ok(session_id) = self.codec.open(token) else {
            return Ok(());
        };
        self.cache.delete(&session_key(&session_id)).await?;
        Ok(())
    }

    pub async fn ping(&self) -> AuthResult<()> {
        self.cache.ping().await?;
        Ok(())
    }
}
