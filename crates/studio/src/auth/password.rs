//! Argon2id password hashing and verification.
//!
//! Hashes use the PHC string format so the algorithm parameters and salt
//! travel with the hash itself. Plaintext credentials are never persisted
//! or compared directly.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a plaintext password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` when the password simply does not match; any other
/// error means the stored hash itself is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Check minimum password strength before hashing.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_uses_argon2id() {
        let hash = hash_password("midnight-lantern").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("midnight-lantern", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("midnight-lantern").unwrap();
        assert!(!verify_password("noon-lantern", &hash).unwrap());
    }

    #[test]
    fn two_hashes_of_same_password_differ() {
        // Random salts mean identical inputs never share a hash.
        let a = hash_password("midnight-lantern").unwrap();
        let b = hash_password("midnight-lantern").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn short_password_rejected() {
        let err = validate_password_strength("five!").unwrap_err();
        assert!(err.contains("at least 6 characters"));
    }

    #[test]
    fn minimum_length_password_accepted() {
        assert!(validate_password_strength("sixsix").is_ok());
    }

    #[test]
    fn malformed_hash_is_an_error_not_false() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
