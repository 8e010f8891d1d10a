//! Password hashing and policy

use mdahub_common::PortalError;

use crate::model::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Hash a plaintext password with the portal's fixed bcrypt cost.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    bcrypt::hash(password, 10u32).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

/// Verify a plaintext password against a stored hash. A malformed hash
/// counts as a mismatch rather than an error.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

/// Enforce the password policy before hashing.
pub fn validate_password(password: &str) -> anyhow::Result<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PortalError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ))
        .into());
    }
    // Bcrypt truncates beyond 72 bytes
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PortalError::Validation(format!(
            "password must be at most {} characters",
            MAX_PASSWORD_LENGTH
        ))
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hashed));
        assert!(!verify_password("wrong password", &hashed));
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password(&"x".repeat(73)).is_err());
    }

    #[test]
    fn test_validation_error_downcasts() {
        let err = validate_password("short").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PortalError>(),
            Some(PortalError::Validation(_))
        ));
    }
}
