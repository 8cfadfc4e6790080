//! Integration tests for the token lifecycle.
//!
//! Tests login, refresh, logout, session expiry and forgery resistance against
//! the in-memory principal store and session cache.

use chrono::Utc;
use restaurant_sso::auth::{
    AccessTokenClaims, AuthConfig, AuthError, AuthManager, PasswordHasher, RefreshSession,
    RefreshTokenClaims, RefreshTokenCodec, Role, TokenVerifier, session_key,
};
use restaurant_sso::cache::{MemorySessionCache, SessionCache};
use restaurant_sso::db::InMemoryPrincipalRepository;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const SECRET: &str = "integration-test-secret-0123456789abcdef";
const PEPPER: &str = "integration-pepper";

struct Harness {
    auth: AuthManager,
    principals: InMemoryPrincipalRepository,
    cache: Arc<MemorySessionCache>,
}

/// Helper to create an auth manager over fresh in-memory backends
fn setup_with(config: AuthConfig, cache: MemorySessionCache) -> Harness {
    let principals = InMemoryPrincipalRepository::new();
    let cache = Arc::new(cache);
    let auth = AuthManager::new(config, Arc::new(principals.clone()), cache.clone());
    Harness {
        auth,
        principals,
        cache,
    }
}

fn setup() -> Harness {
    setup_with(AuthConfig::new(SECRET, PEPPER), MemorySessionCache::new())
}

async fn add_principal(h: &Harness, role: Role, identifier: &str, password: &str) -> Uuid {
    let hash = PasswordHasher::new(PEPPER).hash(password).unwrap();
    h.principals.insert(role, identifier, &hash).await
}

fn session_id_of(refresh_token: &str) -> Uuid {
    let claims: RefreshTokenClaims = TokenVerifier::new(SECRET).verify(refresh_token).unwrap();
    claims.sub.parse().unwrap()
}

#[tokio::test]
async fn test_login_refresh_logout_scenario() {
    let h = setup();
    let id = add_principal(&h, Role::Customer, "a@b.com", "p1").await;

    let pair = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap();

    let access = h.auth.refresh(&pair.refresh_token).await.unwrap();
    let principal = h.auth.verify_access_token(&access).unwrap();
    assert_eq!(principal.principal_id, id);
    assert_eq!(principal.role, Role::Customer);

    h.auth.logout(&pair.refresh_token).await;

    let result = h.auth.refresh(&pair.refresh_token).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_login_access_token_claims() {
    let h = setup();
    for (role, identifier) in [
        (Role::Customer, "c@example.com"),
        (Role::Waiter, "waiter1"),
        (Role::Admin, "admin1"),
    ] {
        let id = add_principal(&h, role, identifier, "secret").await;
        let pair = h.auth.login(role, identifier, "secret").await.unwrap();

        let claims: AccessTokenClaims = TokenVerifier::new(SECRET).verify(&pair.access_token).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.aud, vec![role]);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = setup();
    add_principal(&h, Role::Waiter, "bob", "right").await;

    let wrong_password = h.auth.login(Role::Waiter, "bob", "wrong").await.unwrap_err();
    let unknown = h.auth.login(Role::Waiter, "alice", "right").await.unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown.to_string());
    assert_eq!(wrong_password.client_message(), unknown.client_message());

    // Failed logins open no sessions
    assert!(h.cache.is_empty().await);
}

#[tokio::test]
async fn test_refresh_does_not_rotate() {
    let h = setup();
    let id = add_principal(&h, Role::Admin, "root", "pw").await;
    let pair = h.auth.login(Role::Admin, "root", "pw").await.unwrap();

    for _ in 0..3 {
        let access = h.auth.refresh(&pair.refresh_token).await.unwrap();
        assert_eq!(h.auth.verify_access_token(&access).unwrap().principal_id, id);
    }
    assert_eq!(h.cache.len().await, 1);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let h = setup();
    add_principal(&h, Role::Customer, "a@b.com", "p1").await;
    let pair = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap();

    h.auth.logout(&pair.refresh_token).await;
    h.auth.logout(&pair.refresh_token).await;
    h.auth.logout("garbage").await;
    h.auth.logout("").await;

    assert!(h.cache.is_empty().await);
}

#[tokio::test]
async fn test_logout_only_revokes_its_own_session() {
    let h = setup();
    add_principal(&h, Role::Customer, "a@b.com", "p1").await;

    let first = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap();
    let second = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap();
    assert_eq!(h.cache.len().await, 2);

    h.auth.logout(&first.refresh_token).await;

    assert!(h.auth.refresh(&first.refresh_token).await.is_err());
    assert!(h.auth.refresh(&second.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_evicted_session_invalidates_live_token() {
    let h = setup();
    add_principal(&h, Role::Customer, "a@b.com", "p1").await;
    let pair = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap();

    // The token's own expiry is a week away; the store is authoritative
    let session_id = session_id_of(&pair.refresh_token);
    h.cache.delete(&session_key(&session_id)).await.unwrap();

    let result = h.auth.refresh(&pair.refresh_token).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_session_ttl_elapses() {
    let config = AuthConfig::new(SECRET, PEPPER)
        .with_ttls(Duration::from_secs(1), Duration::from_secs(2));
    let h = setup_with(config, MemorySessionCache::new());
    add_principal(&h, Role::Waiter, "bob", "pw").await;

    let pair = h.auth.login(Role::Waiter, "bob", "pw").await.unwrap();
    assert!(h.auth.refresh(&pair.refresh_token).await.is_ok());

    tokio::time::sleep(Duration::from_millis(2200)).await;

    let result = h.auth.refresh(&pair.refresh_token).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_stale_session_rejected_when_cache_ignores_ttl() {
    let h = setup_with(
        AuthConfig::new(SECRET, PEPPER),
        MemorySessionCache::with_ttl_disabled(),
    );

    let session_id = Uuid::new_v4();
    let now = Utc::now();
    let record = RefreshSession {
        principal_id: Uuid::new_v4(),
        role: Role::Customer,
        expires_at: now - chrono::Duration::minutes(1),
    };
    h.cache
        .set(
            &session_key(&session_id),
            &serde_json::to_string(&record).unwrap(),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

    let token = RefreshTokenCodec::new(SECRET)
        .seal(session_id, now, now + chrono::Duration::days(1))
        .unwrap();

    let result = h.auth.refresh(&token).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_expired_envelope_over_live_session() {
    let h = setup();

    // The session is live; only the token's own exp has passed
    let session_id = Uuid::new_v4();
    let now = Utc::now();
    let record = RefreshSession {
        principal_id: Uuid::new_v4(),
        role: Role::Waiter,
        expires_at: now + chrono::Duration::days(1),
    };
    h.cache
        .set(
            &session_key(&session_id),
            &serde_json::to_string(&record).unwrap(),
            Duration::from_secs(86_400),
        )
        .await
        .unwrap();

    let token = RefreshTokenCodec::new(SECRET)
        .seal(
            session_id,
            now - chrono::Duration::hours(1),
            now - chrono::Duration::seconds(5),
        )
        .unwrap();

    let result = h.auth.refresh(&token).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));

    // Logout with an expired envelope cannot name a session
    h.auth.logout(&token).await;
    assert!(h.cache.get(&session_key(&session_id)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_out_of_range_ttl_fails_login_without_session() {
    let config = AuthConfig::new(SECRET, PEPPER)
        .with_ttls(Duration::from_secs(900), Duration::from_secs(100_000_000_000_000_000));
    let h = setup_with(config, MemorySessionCache::new());
    add_principal(&h, Role::Customer, "a@b.com", "p1").await;

    let err = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap_err();
    assert!(err.is_internal());
    assert_eq!(err.client_message(), "Internal server error");
    assert!(h.cache.is_empty().await);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let h = setup();
    add_principal(&h, Role::Customer, "a@b.com", "p1").await;
    let pair = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap();

    // Forge an envelope around a real, live session id
    let session_id = session_id_of(&pair.refresh_token);
    let now = Utc::now();
    let forged = RefreshTokenCodec::new("attacker-controlled-secret-0123456789")
        .seal(session_id, now, now + chrono::Duration::days(1))
        .unwrap();

    let result = h.auth.refresh(&forged).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));

    // Logging out with the forgery must not touch the real session
    h.auth.logout(&forged).await;
    assert!(h.auth.refresh(&pair.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_tampered_subject_is_rejected() {
    let h = setup();
    add_principal(&h, Role::Customer, "a@b.com", "p1").await;
    let victim = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap();
    add_principal(&h, Role::Customer, "x@y.com", "p2").await;
    let attacker = h.auth.login(Role::Customer, "x@y.com", "p2").await.unwrap();

    // Splice the victim's payload into the attacker's token
    let victim_parts: Vec<&str> = victim.refresh_token.split('.').collect();
    let attacker_parts: Vec<&str> = attacker.refresh_token.split('.').collect();
    let spliced = format!("{}.{}.{}", attacker_parts[0], victim_parts[1], attacker_parts[2]);

    let result = h.auth.refresh(&spliced).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_access_token_cannot_be_used_as_refresh_token() {
    let h = setup();
    add_principal(&h, Role::Customer, "a@b.com", "p1").await;
    let pair = h.auth.login(Role::Customer, "a@b.com", "p1").await.unwrap();

    let result = h.auth.refresh(&pair.access_token).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));

    let result = h.auth.verify_access_token(&pair.refresh_token);
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_concurrent_logins_open_independent_sessions() {
    let h = setup();
    add_principal(&h, Role::Waiter, "bob", "pw").await;
    let auth = Arc::new(h.auth);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let auth = auth.clone();
        handles.push(tokio::spawn(async move {
            auth.login(Role::Waiter, "bob", "pw").await
        }));
    }

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap().unwrap().refresh_token);
    }
    assert_eq!(h.cache.len().await, 8);

    let session_ids: std::collections::HashSet<Uuid> =
        tokens.iter().map(|t| session_id_of(t)).collect();
    assert_eq!(session_ids.len(), 8);
}
