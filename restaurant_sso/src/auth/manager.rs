//! Authentication manager implementation.

use std::sync::Arc;

use super::{
    config::AuthConfig,
    errors::{AuthError, AuthResult},
    models::{AccessPrincipal, HealthStatus, Role, TokenPair},
    password::PasswordHasher,
    sessions::SessionStore,
    tokens::{AccessTokenIssuer, TokenVerifier},
};
use crate::{cache::SessionCache, db::PrincipalRepository};

/// Login, refresh and logout over a principal store and a session cache.
///
/// Every method is an independent request; the manager holds no mutable
/// state and can be shared behind an `Arc`.
#[derive(Clone)]
pub struct AuthManager {
    principals: Arc<dyn PrincipalRepository>,
    hasher: PasswordHasher,
    access: AccessTokenIssuer,
    sessions: SessionStore,
    verifier: TokenVerifier,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `config` - Signing secret, pepper and token lifetimes
    /// * `principals` - Customer/waiter/admin lookup
    /// * `cache` - Backend for refresh sessions
    pub fn new(
        config: AuthConfig,
        principals: Arc<dyn PrincipalRepository>,
        cache: Arc<dyn SessionCache>,
    ) -> Self {
        Self {
            principals,
            hasher: PasswordHasher::new(config.password_pepper.clone()),
            access: AccessTokenIssuer::new(&config.jwt_secret, config.access_ttl),
            sessions: SessionStore::new(cache, &config.jwt_secret, config.refresh_ttl),
            verifier: TokenVerifier::new(&config.jwt_secret),
        }
    }

    /// Login a principal
    ///
    /// # Arguments
    ///
    /// * `role` - Which kind of principal is logging in
    /// * `identifier` - Email for customers, login for waiters and admins
    /// * `password` - Plaintext password
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown identifier or wrong password
    /// * Internal errors if the lookup, signing, or session write fails; no
    ///   tokens are returned in that case
    pub async fn login(&self, role: Role, identifier: &str, password: &str) -> AuthResult<TokenPair> {
        let Some(principal) = self.principals.find_by_identifier(role, identifier).await? else {
            self.hasher.verify_dummy(password);
            log::info!("auth.login: {role} not found");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(&principal.password_hash, password) {
            log::info!("auth.login: wrong password for {role} {}", principal.id);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.access.issue(principal.id, principal.role)?;
        let refresh_token = self
            .sessions
            .issue_refresh(principal.id, principal.role)
            .await
            .inspect_err(|e| log::error!("auth.login: failed to open session: {e}"))?;

        log::info!("auth.login: {role} {} logged in", principal.id);
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated and stays valid until it
    /// expires or is revoked.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidToken` - Bad signature, expired, or revoked
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<String> {
        let principal = self.sessions.verify_refresh(refresh_token).await?;
        self.access.issue(principal.principal_id, principal.role)
    }

    /// Logout by revoking the session behind a refresh token.
    ///
    /// Always succeeds: unknown, expired, or garbled tokens are ignored and a
    /// cache failure is only logged.
    pub async fn logout(&self, refresh_token: &str) {
        if let Err(e) = self.sessions.revoke(refresh_token).await {
            log::warn!("auth.logout: failed to revoke session: {e}");
        }
    }

    /// Verify an access token
    ///
    /// # Returns
    ///
    /// * `AuthResult<AccessPrincipal>` - Principal id and role carried by the token
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessPrincipal> {
        self.verifier.verify_access(token)
    }

    /// Ping the principal store and the session cache.
    ///
    /// Failures are logged here and reported only as `false`.
    pub async fn health_check(&self) -> HealthStatus {
        let database = self
            .principals
            .ping()
            .await
            .inspect_err(|e| log::error!("auth.health: principal store unreachable: {e}"))
            .is_ok();
        let cache = self
            .sessions
            .ping()
            .await
            .inspect_err(|e| log::error!("auth.health: session cache unreachable: {e}"))
            .is_ok();

        HealthStatus { database, cache }
    }
}
