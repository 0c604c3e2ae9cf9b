/// Password Hashing and Verification
///
/// Argon2id with a fresh random salt per hash. Hashes are PHC strings, so the
/// algorithm parameters travel with the hash and verification reads them back.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::error::AuthError;

/// Hash a password using Argon2id
///
/// Two calls with the same input return different strings because each draws
/// its own salt.
///
/// # Errors
/// Returns `AuthError::Hashing` if Argon2 rejects its parameters or input
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored hash
///
/// Returns `Ok(false)` for a wrong password and for an empty one checked
/// against a readable hash.
///
/// # Errors
/// Returns `AuthError::Hashing` if `hash` is not a readable PHC string, even
/// when the password is empty
pub fn check_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::Hashing(format!("invalid hash: {}", e)))?;

    if password.is_empty() {
        return Ok(false);
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hashing(e.to_string())),
    }
}

/// Like [`check_password`], but a wrong password is `AuthError::Mismatch`
pub fn verify_credentials(password: &str, hash: &str) -> Result<(), AuthError> {
    if check_password(password, hash)? {
        Ok(())
    } else {
        Err(AuthError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "password1";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("password1").expect("Failed to hash password");
        let second = hash_password("password1").expect("Failed to hash password");

        assert_ne!(first, second);
    }

    #[test]
    fn test_check_correct_password() {
        let hash = hash_password("password1").expect("Failed to hash password");

        assert!(check_password("password1", &hash).expect("Failed to check password"));
    }

    #[test]
    fn test_check_wrong_password() {
        let hash = hash_password("password1").expect("Failed to hash password");

        assert!(!check_password("wrongPassword", &hash).expect("Failed to check password"));
    }

    #[test]
    fn test_password_does_not_match_other_hash() {
        let hash2 = hash_password("password2").expect("Failed to hash password");

        assert!(!check_password("password1", &hash2).expect("Failed to check password"));
    }

    #[test]
    fn test_empty_password_never_matches() {
        let hash = hash_password("password1").expect("Failed to hash password");
        assert!(!check_password("", &hash).expect("Failed to check password"));

        let empty_hash = hash_password("").expect("Failed to hash password");
        assert!(!check_password("", &empty_hash).expect("Failed to check password"));
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let result = check_password("password1", "not-a-valid-hash");

        assert!(matches!(result, Err(AuthError::Hashing(_))));

        let result = check_password("", "not-a-valid-hash");
        assert!(matches!(result, Err(AuthError::Hashing(_))));
    }

    #[test]
    fn test_verify_credentials() {
        let hash = hash_password("password1").expect("Failed to hash password");

        assert_eq!(verify_credentials("password1", &hash), Ok(()));
        assert_eq!(verify_credentials("password2", &hash), Err(AuthError::Mismatch));
    }
}
