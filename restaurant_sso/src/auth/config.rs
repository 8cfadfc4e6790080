//! Token and hashing configuration.

use std::time::Duration;

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Process-wide authentication settings, fixed at startup.
///
/// TTLs are applied with whole-second precision, matching JWT `exp`/`iat`.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret for access and refresh tokens
    pub jwt_secret: String,
    /// Server-side pepper appended to passwords before hashing
    pub password_pepper: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token and session lifetime
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Create a configuration with the default token lifetimes
    pub fn new(jwt_secret: impl Into<String>, password_pepper: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            password_pepper: password_pepper.into(),
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
        }
    }

    /// Override both token lifetimes
    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}
