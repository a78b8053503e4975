use lazy_static::lazy_static;
use regex::Regex;

use crate::common::ApiError;

pub const MIN_PASSWORD_CHARS: usize = 8;

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]{3,32}$").unwrap();
}

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(ApiError::validation(
            "username must be 3-32 letters, digits or underscores",
        ))
    }
}

/// Deliberately loose: one `@` with something on both sides
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ApiError::validation("email must be a valid address")),
    }
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("Toy_Lover_42").is_ok());
        assert!(validate_username(&"a".repeat(32)).is_ok());

        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("toy lover").is_err());
        assert!(validate_username("toy-lover").is_err());
        assert!(validate_username("jörg").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("sam@example.com").is_ok());
        assert!(validate_email("sam@localhost").is_ok());
        assert!(validate_email("sam.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("sam@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
    }
}
