use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    })
}

/// Case-folds and trims an email so lookups and uniqueness are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !email_regex().is_match(email) {
        return Err(AppError::ValidationError(
            "Invalid email format".to_string(),
        ));
    }
    Ok(())
}

/// Default password for accounts created without one: the email's local part.
pub fn default_password_for(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@gym.com").is_ok());
        assert!(validate_email("first.last@sub.gym.co").is_ok());
        assert!(validate_email("admin.gym.com").is_err());
        assert!(validate_email("admin@gym").is_err());
        assert!(validate_email("a b@gym.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Gym.COM "), "admin@gym.com");
    }

    #[test]
    fn test_default_password_for() {
        assert_eq!(default_password_for("maria.lopez@gym.com"), "maria.lopez");
    }
}
