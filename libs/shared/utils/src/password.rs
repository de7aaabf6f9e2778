use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{instrument, warn};

use shared_models::AppError;

/// Argon2id hash in PHC string form. The plaintext is never stored.
#[instrument(skip(password))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// True only when `hash` is a well-formed hash of `password`.
#[instrument(skip(password, hash))]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret-Pass").unwrap();

        assert_ne!(hash, "s3cret-Pass");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-Pass", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("repeat").unwrap();
        let second = hash_password("repeat").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "plaintext-password"));
    }
}
