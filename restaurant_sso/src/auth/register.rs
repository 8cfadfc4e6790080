//! Principal registration.
//!
//! Customers register themselves. Waiters and admins are staff accounts and
//! must present the staff registration secret.

use std::sync::Arc;
use subtle::ConstantTimeEq;

use super::{
    errors::{AuthError, AuthResult},
    models::{
        PrincipalId, RegisterAdminRequest, RegisterCustomerRequest, RegisterWaiterRequest, Role,
    },
    password::PasswordHasher,
};
use crate::db::{NewAdmin, NewCustomer, NewWaiter, PrincipalRepository};

/// Creates customer, waiter and admin accounts
#[derive(Clone)]
pub struct RegistrationManager {
    principals: Arc<dyn PrincipalRepository>,
    hasher: PasswordHasher,
    staff_secret: String,
}

impl RegistrationManager {
    /// # Arguments
    ///
    /// * `principals` - Principal store
    /// * `password_pepper` - Must match the pepper used by `AuthManager`
    /// * `staff_secret` - Secret required to register waiters and admins
    pub fn new(
        principals: Arc<dyn PrincipalRepository>,
        password_pepper: impl Into<String>,
        staff_secret: impl Into<String>,
    ) -> Self {
        Self {
            principals,
            hasher: PasswordHasher::new(password_pepper),
            staff_secret: staff_secret.into(),
        }
    }

    /// Register a customer
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidInput` - Empty name/password or malformed email
    /// * `AuthError::AlreadyExists` - Email already registered
    pub async fn register_customer(
        &self,
        request: RegisterCustomerRequest,
    ) -> AuthResult<PrincipalId> {
        validate_email(&request.email)?;
        require("name", &request.name)?;
        require("password", &request.password)?;

        log::info!("register.customer: registering {}", request.email);
        self.ensure_available(Role::Customer, &request.email).await?;

        let password_hash = self.hasher.hash(&request.password)?;
        let id = self
            .principals
            .create_customer(NewCustomer {
                email: request.email,
                name: request.name,
                birth_date: request.birth_date,
                password_hash,
            })
            .await?;

        log::info!("register.customer: customer {id} registered");
        Ok(id)
    }

    /// Register a waiter
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidSecretToken` - Staff secret mismatch
    /// * `AuthError::InvalidInput` - Empty required field
    /// * `AuthError::AlreadyExists` - Login already taken
    pub async fn register_waiter(&self, request: RegisterWaiterRequest) -> AuthResult<PrincipalId> {
        self.check_staff_secret(&request.secret_token)?;
        require("login", &request.login)?;
        require("password", &request.password)?;
        require("first_name", &request.first_name)?;
        require("last_name", &request.last_name)?;

        log::info!("register.waiter: registering {}", request.login);
        self.ensure_available(Role::Waiter, &request.login).await?;

        let password_hash = self.hasher.hash(&request.password)?;
        let id = self
            .principals
            .create_waiter(NewWaiter {
                login: request.login,
                first_name: request.first_name,
                last_name: request.last_name,
                password_hash,
            })
            .await?;

        log::info!("register.waiter: waiter {id} registered");
        Ok(id)
    }

    /// Register an admin
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidSecretToken` - Staff secret mismatch
    /// * `AuthError::InvalidInput` - Empty login or password
    /// * `AuthError::AlreadyExists` - Login already taken
    pub async fn register_admin(&self, request: RegisterAdminRequest) -> AuthResult<PrincipalId> {
        self.check_staff_secret(&request.secret_token)?;
        require("login", &request.login)?;
        require("password", &request.password)?;

        log::info!("register.admin: registering {}", request.login);
        self.ensure_available(Role::Admin, &request.login).await?;

        let password_hash = self.hasher.hash(&request.password)?;
        let id = self
            .principals
            .create_admin(NewAdmin {
                login: request.login,
                note: request.note.filter(|n| !n.trim().is_empty()),
                password_hash,
            })
            .await?;

        log::info!("register.admin: admin {id} registered");
        Ok(id)
    }

    fn check_staff_secret(&self, token: &str) -> AuthResult<()> {
        if bool::from(token.as_bytes().ct_eq(self.staff_secret.as_bytes())) {
            Ok(())
        } else {
            log::warn!("register: invalid staff secret token");
            Err(AuthError::InvalidSecretToken)
        }
    }

    async fn ensure_available(&self, role: Role, identifier: &str) -> AuthResult<()> {
        if self.principals.identifier_exists(role, identifier).await? {
            log::info!("register.{role}: {identifier} already exists");
            return Err(AuthError::AlreadyExists(role));
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> AuthResult<()> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

/// Shape check only: one `@`, non-empty local part, dotted domain, no spaces
fn validate_email(email: &str) -> AuthResult<()> {
    let invalid = || AuthError::InvalidInput("email is invalid".to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}
