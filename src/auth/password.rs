use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::error::AccountError;

pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| {
            tracing::error!(error = %err, "password hashing failed");
            AccountError::Internal("Account creation failed".to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AccountError> {
    let parsed = PasswordHash::new(hash).map_err(|err| {
        tracing::error!(error = %err, "stored password hash is unreadable");
        AccountError::Integrity("Stored credentials are unreadable".to_string())
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};
    use crate::error::AccountError;

    #[test]
    fn hash_verifies_only_original_password() {
        let hash = hash_password("Pw1!").expect("hash should succeed");

        assert_ne!(hash, "Pw1!");
        assert!(verify_password("Pw1!", &hash).expect("verify should run"));
        assert!(!verify_password("wrong", &hash).expect("verify should run"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same-password").expect("hash should succeed");
        let second = hash_password("same-password").expect("hash should succeed");

        assert_ne!(first, second);
    }

    #[test]
    fn unreadable_hash_is_an_integrity_error() {
        let err = verify_password("Pw1!", "not-a-valid-hash").expect_err("verify should fail");

        assert!(matches!(err, AccountError::Integrity(_)));
    }
}
