//! Authentication API handlers.
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"role": "waiter", "identifier": "bob", "password": "Pass123!"}'
//! ```
//!
//! Refresh:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/refresh \
//!   -H "Content-Type: application/json" \
//!   -d '{"refresh_token": "eyJhbGciOiJIUzI1NiIs..."}'
//! ```

use axum::{Extension, Json, extract::State, http::StatusCode};
use restaurant_sso::auth::{AccessPrincipal, AuthError, Role};
use serde::{Deserialize, Serialize};

use super::{AppState, request_id::RequestId};
use crate::logging::log_security_event;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub role: String,
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenPayload {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map an auth error to a status code and client-safe body.
///
/// Internal errors are logged here and reach the client only as
/// "Internal server error".
pub fn error_response(err: AuthError) -> ApiError {
    let status = match &err {
        AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::InvalidSecretToken => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::AlreadyExists(_) => StatusCode::CONFLICT,
        AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => {
            tracing::error!("internal error: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Authenticate a principal and open a session.
///
/// # Request Body
///
/// ```json
/// { "role": "customer", "identifier": "ann@example.com", "password": "p1" }
/// ```
///
/// `identifier` is the email for customers and the login for staff.
///
/// # Response
///
/// `200 OK` with `{"access_token": "...", "refresh_token": "..."}`.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown role, unknown identifier, or wrong password
/// - `500 Internal Server Error`: Store, cache, or signing failure
pub async fn login(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    // An unknown role is reported exactly like an unknown identifier
    let Ok(role) = payload.role.parse::<Role>() else {
        log_security_event(
            "failed_login",
            None,
            Some(request_id.as_str()),
            "Unknown role",
        );
        return Err(error_response(AuthError::InvalidCredentials));
    };

    match state
        .auth_manager
        .login(role, &payload.identifier, &payload.password)
        .await
    {
        Ok(tokens) => Ok(Json(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })),
        Err(e) => {
            if matches!(e, AuthError::InvalidCredentials) {
                let subject = format!("{role}:{}", payload.identifier);
                log_security_event(
                    "failed_login",
                    Some(&subject),
                    Some(request_id.as_str()),
                    "Invalid credentials",
                );
            }
            Err(error_response(e))
        }
    }
}

/// Exchange a refresh token for a new access token.
///
/// The refresh token is not rotated.
///
/// # Errors
///
/// - `401 Unauthorized`: Bad signature, expired, or revoked refresh token
/// - `500 Internal Server Error`: Cache or signing failure
pub async fn refresh(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(payload): Json<RefreshTokenPayload>,
) -> Result<Json<RefreshResponse>, ApiError> {
    match state.auth_manager.refresh(&payload.refresh_token).await {
        Ok(access_token) => Ok(Json(RefreshResponse { access_token })),
        Err(e) => {
            if matches!(e, AuthError::InvalidToken) {
                log_security_event(
                    "invalid_refresh_token",
                    None,
                    Some(request_id.as_str()),
                    "Rejected refresh token",
                );
            }
            Err(error_response(e))
        }
    }
}

/// Revoke the session behind a refresh token.
///
/// Always returns `200 OK` with `{"status": "OK"}`, whether or not the token
/// named a live session. Access tokens stay valid until they expire.
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenPayload>,
) -> Json<StatusResponse> {
    state.auth_manager.logout(&payload.refresh_token).await;
    Json(StatusResponse {
        status: "OK".to_string(),
    })
}

/// Identity behind the bearer access token
pub async fn me(Extension(principal): Extension<AccessPrincipal>) -> Json<AccessPrincipal> {
    Json(principal)
}
