//! Argon2id password hashing. CPU-heavy work runs on the blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::domain::error::DomainError;

/// Verified when the user does not exist so both login failure paths cost the same.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("not-a-real-password").ok());

/// Hash with a fresh random salt, returning a PHC string.
pub fn hash_password(plain: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string())
}

/// Constant-time check of `plain` against a PHC string. Malformed hashes never match.
pub fn verify_password(plain: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn is_valid_hash(phc: &str) -> bool {
    PasswordHash::new(phc).is_ok()
}

pub async fn hash_password_blocking(plain: String) -> Result<String, DomainError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| DomainError::internal(format!("hashing task failed: {e}")))?
        .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
}

/// Verify on the blocking pool; `None` verifies against a dummy hash and always fails.
pub async fn verify_password_blocking(
    plain: String,
    phc: Option<String>,
) -> Result<bool, DomainError> {
    tokio::task::spawn_blocking(move || match phc {
        Some(phc) => verify_password(&plain, &phc),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&plain, dummy);
            }
            false
        }
    })
    .await
    .map_err(|e| DomainError::internal(format!("verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifies() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();

        assert_ne!(a, b, "each hash gets its own salt");
        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("hunter2"));
        assert!(verify_password("hunter2", &a));
        assert!(!verify_password("hunter3", &a));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("secret", "secret"));
        assert!(!is_valid_hash("plain-text"));
    }

    #[tokio::test]
    async fn missing_user_path_always_fails() {
        assert!(!verify_password_blocking("anything".into(), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn blocking_helpers_roundtrip() {
        let phc = hash_password_blocking("pa55".into()).await.unwrap();
        assert!(is_valid_hash(&phc));
        assert!(verify_password_blocking("pa55".into(), Some(phc))
            .await
            .unwrap());
    }
}
