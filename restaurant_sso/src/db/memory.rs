//! In-memory principal repository for tests and local development.

use async_trait::async_trait;
use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{NewAdmin, NewCustomer, NewWaiter, PrincipalRepository};
use crate::auth::{AuthError, AuthResult, Principal, PrincipalId, Role};

/// [`PrincipalRepository`] backed by a map keyed on `(role, identifier)`.
///
/// Only the credential fields are kept; profile data passed to the `create_*`
/// methods is discarded.
#[derive(Clone, Default)]
pub struct InMemoryPrincipalRepository {
    principals: Arc<RwLock<HashMap<(Role, String), Principal>>>,
}

impl InMemoryPrincipalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a customer keyed by email and return its id
    pub async fn insert_customer(&self, email: &str, password_hash: &str) -> PrincipalId {
        self.insert(Role::Customer, email, password_hash).await
    }

    /// Insert a principal directly, bypassing registration
    pub async fn insert(&self, role: Role, identifier: &str, password_hash: &str) -> PrincipalId {
        let id = Uuid::new_v4();
        self.principals.write().await.insert(
            (role, identifier.to_string()),
            Principal {
                id,
                role,
                password_hash: password_hash.to_string(),
            },
        );
        id
    }

    /// Insert unless the key is taken, like the unique constraint on the real tables
    async fn create(&self, role: Role, identifier: &str, password_hash: &str) -> AuthResult<PrincipalId> {
        let mut principals = self.principals.write().await;
        match principals.entry((role, identifier.to_string())) {
            Entry::Occupied(_) => Err(AuthError::AlreadyExists(role)),
            Entry::Vacant(slot) => {
                let id = Uuid::new_v4();
                slot.insert(Principal {
                    id,
                    role,
                    password_hash: password_hash.to_string(),
                });
                Ok(id)
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.principals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PrincipalRepository for InMemoryPrincipalRepository {
    async fn find_by_identifier(
        &self,
        role: Role,
        identifier: &str,
    ) -> AuthResult<Option<Principal>> {
        let principals = self.principals.read().await;
        Ok(principals.get(&(role, identifier.to_string())).cloned())
    }

    async fn identifier_exists(&self, role: Role, identifier: &str) -> AuthResult<bool> {
        let principals = self.principals.read().await;
        Ok(principals.contains_key(&(role, identifier.to_string())))
    }

    async fn create_customer(&self, customer: NewCustomer) -> AuthResult<PrincipalId> {
        self.create(Role::Customer, &customer.email, &customer.password_hash).await
    }

    async fn create_waiter(&self, waiter: NewWaiter) -> AuthResult<PrincipalId> {
        self.create(Role::Waiter, &waiter.login, &waiter.password_hash).await
    }

    async fn create_admin(&self, admin: NewAdmin) -> AuthResult<PrincipalId> {
        self.create(Role::Admin, &admin.login, &admin.password_hash).await
    }

    async fn ping(&self) -> AuthResult<()> {
        Ok(())
    }
}
