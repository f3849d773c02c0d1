//! Password hashing
//!
//! Hashes are argon2id PHC strings with a random per-password salt.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::IdentityError;

/// Hashes a plain-text password
pub fn hash_password(plain: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plain.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verifies a plain-text password against a PHC string
///
/// Returns `Ok(false)` on mismatch; an unparsable hash is an error.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, IdentityError> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("123456").unwrap();
        let second = hash_password("123456").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_password("123456", &first).unwrap());
        assert!(verify_password("123456", &second).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }
}
