/// Password Hashing and Verification
///
/// Handles password hashing with bcrypt and password strength validation.
/// Credential checking is exposed as a small capability so the session
/// service never depends on the concrete scheme.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Capability consumed by the session service at login time
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AppError>;
}

/// The one concrete adapter: bcrypt
pub struct BcryptCredentials;

impl CredentialVerifier for BcryptCredentials {
    fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        verify_password(password, password_hash)
    }
}

/// Hash a password using bcrypt
///
/// # Errors
/// Returns error if:
/// - Password fails validation (too short, weak, etc.)
/// - Bcrypt hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    validate_password_strength(password)?;

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

/// Validate password strength requirements
///
/// Requirements:
/// - Minimum 8 characters
/// - Maximum 128 characters
/// - At least one digit
/// - At least one lowercase letter
/// - At least one uppercase letter
fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        )));
    }

    // Max length covers the bcrypt input limit as well
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }

    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());

    if !has_digit || !has_lowercase || !has_uppercase {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            "password must contain at least one digit, one lowercase letter, and one uppercase letter"
                .to_string(),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "ValidPassword123";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_password() {
        let password = "ValidPassword123";
        let hash = hash_password(password).expect("Failed to hash password");

        let is_valid = verify_password(password, &hash).expect("Failed to verify password");
        assert!(is_valid);
    }

    #[test]
    fn test_verify_wrong_password() {
        let password = "ValidPassword123";
        let hash = hash_password(password).expect("Failed to hash password");

        let is_valid = verify_password("WrongPassword123", &hash).expect("Failed to verify password");
        assert!(!is_valid);
    }

    #[test]
    fn test_bcrypt_adapter_agrees_with_the_free_functions() {
        let hash = hash_password("ValidPassword123").unwrap();
        assert!(BcryptCredentials.verify("ValidPassword123", &hash).unwrap());
        assert!(!BcryptCredentials.verify("OtherPassword123", &hash).unwrap());
    }

    #[test]
    fn test_too_short_password() {
        let result = hash_password("Short1");
        assert!(result.is_err());
    }

    #[test]
    fn test_too_long_password() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1) + "A1";
        let result = hash_password(&long_password);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_digits() {
        let result = hash_password("NoDigitsPassword");
        assert!(result.is_err());
    }

    #[test]
    fn test_no_lowercase() {
        let result = hash_password("NOLOWERCASE1");
        assert!(result.is_err());
    }

    #[test]
    fn test_no_uppercase() {
        let result = hash_password("nouppercase1");
        assert!(result.is_err());
    }
}
