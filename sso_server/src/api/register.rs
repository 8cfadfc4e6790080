//! Registration API handlers.
//!
//! Register a waiter:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/register/waiter \
//!   -H "Content-Type: application/json" \
//!   -d '{"login": "bob", "password": "pw", "first_name": "Bob", "last_name": "Smith", "secret_token": "..."}'
//! ```
//!
//! All three handlers answer `201 Created` with `{"entity_id": "<uuid>"}`, or:
//!
//! - `400 Bad Request`: Missing field or malformed email
//! - `401 Unauthorized`: Wrong staff secret (waiter and admin only)
//! - `409 Conflict`: Email or login already registered
//! - `500 Internal Server Error`: Store or hashing failure

use axum::{Json, extract::State, http::StatusCode};
use restaurant_sso::auth::{
    AuthError, PrincipalId, RegisterAdminRequest, RegisterCustomerRequest, RegisterWaiterRequest,
};
use serde::{Deserialize, Serialize};

use super::{
    AppState,
    auth::{ApiError, error_response},
    request_id::RequestId,
};
use crate::logging::log_security_event;

#[derive(Debug, Serialize, Deserialize)]
pub struct EntityResponse {
    pub entity_id: PrincipalId,
}

type Created = (StatusCode, Json<EntityResponse>);

fn created(entity_id: PrincipalId) -> Created {
    (StatusCode::CREATED, Json(EntityResponse { entity_id }))
}

fn staff_error(err: AuthError, request_id: &RequestId, kind: &str) -> ApiError {
    if matches!(err, AuthError::InvalidSecretToken) {
        log_security_event(
            "invalid_staff_secret",
            None,
            Some(request_id.as_str()),
            &format!("Rejected {kind} registration"),
        );
    }
    error_response(err)
}

/// Register a customer.
///
/// ```json
/// { "email": "ann@example.com", "name": "Ann", "birth_date": "1995-05-17", "password": "p1" }
/// ```
pub async fn register_customer(
    State(state): State<AppState>,
    Json(payload): Json<RegisterCustomerRequest>,
) -> Result<Created, ApiError> {
    state
        .registration
        .register_customer(payload)
        .await
        .map(created)
        .map_err(error_response)
}

/// Register a waiter. Requires the staff secret in `secret_token`.
pub async fn register_waiter(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(payload): Json<RegisterWaiterRequest>,
) -> Result<Created, ApiError> {
    state
        .registration
        .register_waiter(payload)
        .await
        .map(created)
        .map_err(|e| staff_error(e, &request_id, "waiter"))
}

/// Register an admin. Requires the staff secret in `secret_token`.
///
/// ```json
/// { "login": "root", "password": "pw", "note": "night shift", "secret_token": "..." }
/// ```
pub async fn register_admin(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(payload): Json<RegisterAdminRequest>,
) -> Result<Created, ApiError> {
    state
        .registration
        .register_admin(payload)
        .await
        .map(created)
        .map_err(|e| staff_error(e, &request_id, "admin"))
}
