//! Argon2id password hashing with a server-side pepper.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use super::errors::{AuthError, AuthResult};

/// Well-formed Argon2id hash at the default cost that no password matches.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$Y0ea1poJCyWCd+yPum+ZQQ$veuboir4+nPln+fE08SK4RZWF912xyB3PN9svDOpHdc";

/// One-way password hashing and verification.
#[derive(Clone)]
pub struct PasswordHasher {
    pepper: String,
}

impl PasswordHasher {
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }

    /// Hash password with Argon2id + pepper.
    ///
    /// The salt is random and embedded in the returned PHC string.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);

        Ok(Argon2::default()
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Check a password against a stored hash.
    ///
    /// Returns `false` on mismatch and on a stored hash that does not parse.
    pub fn verify(&self, hash: &str, password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };
        let peppered = format!("{}{}", password, self.pepper);

        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Run a full verification against a decoy hash and discard the result.
    ///
    /// Used when the principal does not exist, so the response time matches a
    /// wrong-password attempt.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(DECOY_HASH, password);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new("pepper");
        let hash = hasher.hash("p1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "p1"));
        assert!(!hasher.verify(&hash, "p2"));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new("pepper");
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify(&a, "same"));
        assert!(hasher.verify(&b, "same"));
    }

    #[test]
    fn test_pepper_is_part_of_the_hash() {
        let hash = PasswordHasher::new("pepper-a").hash("secret").unwrap();
        assert!(!PasswordHasher::new("pepper-b").verify(&hash, "secret"));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        let hasher = PasswordHasher::new("pepper");
        assert!(!hasher.verify("not-a-phc-string", "anything"));
        assert!(!hasher.verify("", ""));
    }

    #[test]
    fn test_verify_dummy_does_not_panic() {
        let hasher = PasswordHasher::new("pepper");
        hasher.verify_dummy("whatever");
        hasher.verify_dummy("again");
    }

    #[test]
    fn test_decoy_costs_a_full_verification() {
        let decoy = PasswordHash::new(DECOY_HASH).unwrap();
        assert_eq!(decoy.algorithm, argon2::Algorithm::Argon2id.ident());

        let params = argon2::Params::try_from(&decoy).unwrap();
        let default = argon2::Params::default();
        assert_eq!(params.m_cost(), default.m_cost());
        assert_eq!(params.t_cost(), default.t_cost());
        assert_eq!(params.p_cost(), default.p_cost());

        let hasher = PasswordHasher::new("pepper");
        assert!(!hasher.verify(DECOY_HASH, "decoy"));
        assert!(!hasher.verify(DECOY_HASH, ""));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_only_the_original_password_verifies(
            password in "[a-zA-Z0-9]{1,24}",
            other in "[a-zA-Z0-9]{1,24}",
        ) {
            let hasher = PasswordHasher::new("pepper");
            let hash = hasher.hash(&password).unwrap();
            prop_assert!(hasher.verify(&hash, &password));
            prop_assert_eq!(hasher.verify(&hash, &other), password == other);
        }
    }
}
