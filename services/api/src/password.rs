//! Password hashing and verification

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::error;

use crate::error::ApiError;

/// Hash a plain-text password with Argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    if password.is_empty() {
        return Err(ApiError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal
        })?;

    Ok(hash.to_string())
}

/// Verify a plain-text password against a stored Argon2 hash. The
/// comparison runs through Argon2's own verifier, which is constant-time
/// with respect to the digest.
pub fn verify_password(hash: &str, password: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!("Stored password hash is unparseable: {}", e);
        ApiError::Internal
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!("Password verification failed: {}", e);
            Err(ApiError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("matkhau123").unwrap();
        assert_ne!(hash, "matkhau123");
        assert!(verify_password(&hash, "matkhau123").unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("matkhau123").unwrap();
        assert!(!verify_password(&hash, "matkhau456").unwrap());
    }

    #[test]
    fn same_password_hashes_to_different_digests() {
        // fresh salt per call
        assert_ne!(
            hash_password("matkhau123").unwrap(),
            hash_password("matkhau123").unwrap()
        );
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(hash_password("").is_err());
    }

    #[test]
    fn unparseable_stored_hash_is_an_error() {
        assert!(verify_password("not-a-phc-string", "anything").is_err());
    }
}
