//! Principal repository: trait and PostgreSQL implementation.
//!
//! Customers are looked up by email, waiters and admins by login. The three
//! tables share one contract, selected by [`Role`].

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

use crate::auth::{AuthError, AuthResult, Principal, PrincipalId, Role};

/// New customer row; `password_hash` is already hashed
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub password_hash: String,
}

/// New waiter row
#[derive(Debug, Clone)]
pub struct NewWaiter {
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// New admin row
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub login: String,
    pub note: Option<String>,
    pub password_hash: String,
}

/// Read and create principal records
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Find a principal by its natural key (email for customers, login otherwise)
    async fn find_by_identifier(&self, role: Role, identifier: &str)
    -> AuthResult<Option<Principal>>;

    /// Check whether the natural key is already taken for this role
    async fn identifier_exists(&self, role: Role, identifier: &str) -> AuthResult<bool>;

    async fn create_customer(&self, customer: NewCustomer) -> AuthResult<PrincipalId>;

    async fn create_waiter(&self, waiter: NewWaiter) -> AuthResult<PrincipalId>;

    async fn create_admin(&self, admin: NewAdmin) -> AuthResult<PrincipalId>;

    /// Check that the store answers queries
    async fn ping(&self) -> AuthResult<()>;
}

/// Default PostgreSQL implementation of `PrincipalRepository`
pub struct PgPrincipalRepository {
    pool: PgPool,
}

impl PgPrincipalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `(table, id column, natural key column)` for each role
fn table_for(role: Role) -> (&'static str, &'static str, &'static str) {
    match role {
        Role::Customer => ("customers", "customer_id", "email"),
        Role::Waiter => ("waiters", "waiter_id", "login"),
        Role::Admin => ("admins", "admin_id", "login"),
    }
}

#[async_trait]
impl PrincipalRepository for PgPrincipalRepository {
    async fn find_by_identifier(
        &self,
        role: Role,
        identifier: &str,
    ) -> AuthResult<Option<Principal>> {
        let (table, id_column, key_column) = table_for(role);
        let query = format!("SELECT {id_column} AS id, password FROM {table} WHERE {key_column} = $1");

        let row = sqlx::query(&query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| Principal {
            id: r.get("id"),
            role,
            password_hash: r.get("password"),
        }))
    }

    async fn identifier_exists(&self, role: Role, identifier: &str) -> AuthResult<bool> {
        let (table, _, key_column) = table_for(role);
        let query = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE {key_column} = $1)");

        let exists: bool = sqlx::query_scalar(&query)
            .bind(identifier)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn create_customer(&self, customer: NewCustomer) -> AuthResult<PrincipalId> {
        let row = sqlx::query(
            "INSERT INTO customers (email, password, name, birth_date) VALUES ($1, $2, $3, $4) RETURNING customer_id",
        )
        .bind(&customer.email)
        .bind(&customer.password_hash)
        .bind(&customer.name)
        .bind(customer.birth_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, Role::Customer))?;

        Ok(row.get("customer_id"))
    }

    async fn create_waiter(&self, waiter: NewWaiter) -> AuthResult<PrincipalId> {
        let row = sqlx::query(
            "INSERT INTO waiters (login, password, first_name, last_name) VALUES ($1, $2, $3, $4) RETURNING waiter_id",
        )
        .bind(&waiter.login)
        .bind(&waiter.password_hash)
        .bind(&waiter.first_name)
        .bind(&waiter.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, Role::Waiter))?;

        Ok(row.get("waiter_id"))
    }

    async fn create_admin(&self, admin: NewAdmin) -> AuthResult<PrincipalId> {
        let row = sqlx::query(
            "INSERT INTO admins (login, password, note) VALUES ($1, $2, $3) RETURNING admin_id",
        )
        .bind(&admin.login)
        .bind(&admin.password_hash)
        .bind(&admin.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, Role::Admin))?;

        Ok(row.get("admin_id"))
    }

    async fn ping(&self) -> AuthResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// A unique-key race lost to a concurrent registration is still a duplicate
fn insert_error(err: sqlx::Error, role: Role) -> AuthError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AuthError::AlreadyExists(role)
        }
        _ => AuthError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_for_role() {
        assert_eq!(table_for(Role::Customer), ("customers", "customer_id", "email"));
        assert_eq!(table_for(Role::Waiter), ("waiters", "waiter_id", "login"));
        assert_eq!(table_for(Role::Admin), ("admins", "admin_id", "login"));
    }
}
