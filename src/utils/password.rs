use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};

/// bcrypt hashes always start with a `$2a$`/`$2b$`/`$2x$`/`$2y$` version prefix.
pub fn is_bcrypt_hash(stored: &str) -> bool {
    stored.len() == 60
        && ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| stored.starts_with(prefix))
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 6 || password.len() > 72 {
        return Err(AppError::ValidationError(
            "Password must be between 6 and 72 characters".to_string(),
        ));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

/// Constant-time bcrypt comparison. A stored value that is not a bcrypt hash
/// (legacy plaintext rows) is a server-side configuration problem, never a
/// credential mismatch.
pub fn verify_password(password: &str, stored: &str) -> AppResult<bool> {
    if !is_bcrypt_hash(stored) {
        return Err(AppError::ConfigError(
            "Stored password is not a bcrypt hash".to_string(),
        ));
    }
    verify(password, stored)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("abc").is_err());
        assert!(validate_password(&"x".repeat(73)).is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hashed = bcrypt::hash("Password123", 4).unwrap();
        assert!(is_bcrypt_hash(&hashed));
        assert!(verify_password("Password123", &hashed).unwrap());
        assert!(!verify_password("WrongPassword", &hashed).unwrap());
    }

    #[test]
    fn test_plaintext_stored_value_is_config_error() {
        let result = verify_password("admin123", "admin123");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
