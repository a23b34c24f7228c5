//! Password hashing using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

static DECOY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hash a password using Argon2id with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// `Ok(false)` means the password is wrong; `Err` means the stored hash
/// could not be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let argon2 = Argon2::default();
    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Run a full verification against a decoy hash and discard the result.
///
/// Called when no usable hash exists so a lookup miss costs the same as a
/// wrong password.
pub fn verify_decoy(password: &str) {
    let decoy = DECOY_HASH.get_or_init(|| hash_password(&uuid::Uuid::new_v4().to_string()).ok());
    if let Some(hash) = decoy {
        let _ = verify_password(password, hash);
    }
}

/// Validate password strength for new passwords
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    if password.len() > 128 {
        return Err("Password must be at most 128 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "Portfolio2024";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("portfolio2024", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("Portfolio2024").unwrap();
        let b = hash_password("Portfolio2024").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unparseable_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_verify_decoy_is_reusable() {
        verify_decoy("first");
        verify_decoy("second");
        assert!(DECOY_HASH.get().unwrap().is_some());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("SecurePass1").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("nouppercase1").is_err());
        assert!(validate_password("NOLOWERCASE1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
    }
}
