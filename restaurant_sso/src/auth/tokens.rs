//! Signed token issuing and verification.
//!
//! Both token kinds are HS256 JWTs signed with the same shared secret:
//!
//! | Token   | `sub`        | `aud`    | Server-side state     |
//! |---------|--------------|----------|-----------------------|
//! | access  | principal id | `[role]` | none                  |
//! | refresh | session id   | absent   | session in the cache  |
//!
//! Verification failures of any kind (malformed, wrong algorithm, bad
//! signature, expired) surface as [`AuthError::InvalidToken`]; the cause is
//! only logged at debug level.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use uuid::Uuid;

use super::{
    errors::{AuthError, AuthResult},
    models::{AccessPrincipal, AccessTokenClaims, PrincipalId, RefreshTokenClaims, Role},
};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Validates signature and expiry of tokens signed with the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        // Valid while `exp > now`, the same boundary as the session record check
        validation.reject_tokens_expiring_in_less_than = 1;
        // Audience is checked by the caller: refresh tokens carry none and
        // access tokens are matched against the role enum.
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and decode its claims
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> AuthResult<C> {
        decode::<C>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("token rejected: {e}");
                AuthError::InvalidToken
            })
    }

    /// Verify an access token and extract the identity it carries
    pub fn verify_access(&self, token: &str) -> AuthResult<AccessPrincipal> {
        let claims: AccessTokenClaims = self.verify(token)?;
        let role = *claims.aud.first().ok_or(AuthError::InvalidToken)?;
        let principal_id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        Ok(AccessPrincipal { principal_id, role })
    }
}

/// Signs short-lived access tokens.
#[derive(Clone)]
pub struct AccessTokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl AccessTokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue an access token valid from now for the configured TTL
    pub fn issue(&self, principal_id: PrincipalId, role: Role) -> AuthResult<String> {
        self.issue_at(principal_id, role, Utc::now())
    }

    /// Issue an access token as of `now`. Same inputs produce the same token.
    pub fn issue_at(
        &self,
        principal_id: PrincipalId,
        role: Role,
        now: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = AccessTokenClaims {
            sub: principal_id.to_string(),
            aud: vec![role],
            iat: now.timestamp(),
            exp: expiry(now, self.ttl)?.timestamp(),
        };

        sign(&claims, &self.key)
    }
}

/// Wraps session ids in signed, time-boxed refresh tokens.
#[derive(Clone)]
pub struct RefreshTokenCodec {
    key: EncodingKey,
    verifier: TokenVerifier,
}

impl RefreshTokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            verifier: TokenVerifier::new(secret),
        }
    }

    /// Sign a refresh token for `session_id` expiring at `expires_at`
    pub fn seal(
        &self,
        session_id: Uuid,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = RefreshTokenClaims {
            sub: session_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        sign(&claims, &self.key)
    }

    /// Verify a refresh token and recover the session id it wraps
    pub fn open(&self, token: &str) -> AuthResult<Uuid> {
        let claims: RefreshTokenClaims = self.verifier.verify(token)?;
        claims.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// `now + ttl`. Claims built from it keep whole seconds only.
///
/// A TTL that does not fit a timestamp is a configuration error, not a panic.
pub(crate) fn expiry(now: DateTime<Utc>, ttl: Duration) -> AuthResult<DateTime<Utc>> {
    i64::try_from(ttl.as_secs())
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(AuthError::TtlOutOfRange)
}

fn sign<C: Serialize>(claims: &C, key: &EncodingKey) -> AuthResult<String> {
    Ok(encode(&Header::new(ALGORITHM), claims, key)?)
}
