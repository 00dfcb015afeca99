// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng}, Scrypt};
use zeroize::Zeroize;

use crate::error::AppError;

/// Hash a password using scrypt
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a PHC hash string.
///
/// A mismatch is `Ok(false)`; a hash that cannot be parsed is an error
/// because it means the stored credential itself is broken.
pub fn verify_password(hash: &str, plain: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Scrypt.verify_password(plain.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(scrypt::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Securely hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String) -> Result<String, AppError> {
    let hash = hash_password(plain);
    plain.zeroize();
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("SecureP@ssw0rd").unwrap();
        assert_ne!(hash, "SecureP@ssw0rd");
        assert!(verify_password(&hash, "SecureP@ssw0rd").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_an_error() {
        assert!(verify_password("not-a-phc-string", "whatever").is_err());
    }

    #[test]
    fn test_hash_password_secure_wipes_input() {
        let mut plain = "SecureP@ssw0rd".to_string();
        let hash = hash_password_secure(&mut plain).unwrap();
        assert!(plain.is_empty());
        assert!(verify_password(&hash, "SecureP@ssw0rd").unwrap());
    }
}
