//! Input validation utilities
//!
//! Presence and shape checks only. Usernames are matched case-sensitively
//! and may contain spaces, so no character class is enforced on them.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AuthError, AuthResult};
use crate::models::NewUser;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() > 64 {
        return Err("Username must be at most 64 characters long".to_string());
    }

    static CONTROL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = CONTROL_REGEX
        .get_or_init(|| Regex::new(r"[\p{Cc}]").expect("Failed to compile control character regex"));

    if regex.is_match(username) {
        return Err("Username cannot contain control characters".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.trim().is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate display name
pub fn validate_display_name(display_name: &str) -> Result<(), String> {
    if display_name.trim().is_empty() {
        return Err("Display name is required".to_string());
    }

    if display_name.chars().count() > 64 {
        return Err("Display name must be at most 64 characters long".to_string());
    }

    Ok(())
}

/// Validate a registration payload
pub fn validate_new_user(new_user: &NewUser) -> AuthResult<()> {
    validate_username(&new_user.username)
        .and_then(|_| validate_password(&new_user.password))
        .and_then(|_| validate_display_name(&new_user.display_name))
        .map_err(AuthError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_allows_spaces_and_mixed_case() {
        assert!(validate_username("Darth Vader").is_ok());
        assert!(validate_username("Batman").is_ok());
    }

    #[test]
    fn test_username_rejects_blank_and_control_characters() {
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("bat\nman").is_err());
        assert!(validate_username(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_password_requires_presence_only() {
        assert!(validate_password("123abc").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("  ").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_new_user_reports_first_failure() {
        let new_user = NewUser {
            username: "Batman".to_string(),
            password: String::new(),
            display_name: String::new(),
        };

        match validate_new_user(&new_user) {
            Err(AuthError::Validation(msg)) => assert_eq!(msg, "Password is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
