//! Authentication data models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Principal ID type
pub type PrincipalId = Uuid;

/// Kind of principal that can authenticate.
///
/// Serialized in lowercase; the same string is used as the JWT audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Waiter,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Waiter => "waiter",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "waiter" => Ok(Role::Waiter),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Returned when parsing a role name that is not one of the known roles
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Credential record of a principal, as read from the relational store
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
    pub password_hash: String,
}

/// Server-side record behind a refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    pub principal_id: PrincipalId,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Reachability of the two backends, as seen by one health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub database: bool,
    pub cache: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.database && self.cache
    }
}

/// Access and refresh tokens returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity carried by a verified token or session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPrincipal {
    pub principal_id: PrincipalId,
    pub role: Role,
}

/// JWT claims for access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,    // Principal ID
    pub aud: Vec<Role>, // Single-element audience: the role
    pub iat: i64,
    pub exp: i64,
}

/// JWT claims for refresh token. `sub` is the session id, never the principal id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Customer registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCustomerRequest {
    pub email: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub password: String,
}

/// Waiter registration request, gated by the staff secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWaiterRequest {
    pub login: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub secret_token: String,
}

/// Admin registration request, gated by the staff secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAdminRequest {
    pub login: String,
    pub password: String,
    pub note: Option<String>,
    pub secret_token: String,
}
