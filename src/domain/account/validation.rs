//! Presence validation for signup and login input
//!
//! Format rules (email shape, password strength) are out of scope here; the
//! services only reject missing fields before doing any work.

use thiserror::Error;

/// Validation errors for credential input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialInputError {
    #[error("username is required")]
    MissingUsername,

    #[error("email is required")]
    MissingEmail,

    #[error("password is required")]
    MissingPassword,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the signup inputs for presence
pub fn validate_signup_input(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), CredentialInputError> {
    if is_blank(username) {
        return Err(CredentialInputError::MissingUsername);
    }

    if is_blank(email) {
        return Err(CredentialInputError::MissingEmail);
    }

    if is_blank(password) {
        return Err(CredentialInputError::MissingPassword);
    }

    Ok(())
}

/// Check the login inputs for presence
pub fn validate_login_input(email: &str, password: &str) -> Result<(), CredentialInputError> {
    if is_blank(email) {
        return Err(CredentialInputError::MissingEmail);
    }

    if is_blank(password) {
        return Err(CredentialInputError::MissingPassword);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signup_input() {
        assert!(validate_signup_input("alice", "alice@example.com", "Secret123").is_ok());
    }

    #[test]
    fn test_signup_rejects_missing_username() {
        assert_eq!(
            validate_signup_input("", "alice@example.com", "Secret123"),
            Err(CredentialInputError::MissingUsername)
        );
    }

    #[test]
    fn test_signup_rejects_missing_email() {
        assert_eq!(
            validate_signup_input("alice", "", "Secret123"),
            Err(CredentialInputError::MissingEmail)
        );
    }

    #[test]
    fn test_signup_rejects_missing_password() {
        assert_eq!(
            validate_signup_input("alice", "alice@example.com", ""),
            Err(CredentialInputError::MissingPassword)
        );
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        assert_eq!(
            validate_signup_input("   ", "alice@example.com", "Secret123"),
            Err(CredentialInputError::MissingUsername)
        );
        assert_eq!(
            validate_login_input("alice@example.com", "  \t "),
            Err(CredentialInputError::MissingPassword)
        );
    }

    #[test]
    fn test_valid_login_input() {
        assert!(validate_login_input("alice@example.com", "Secret123").is_ok());
    }

    #[test]
    fn test_login_rejects_missing_email() {
        assert_eq!(
            validate_login_input("", "Secret123"),
            Err(CredentialInputError::MissingEmail)
        );
    }

    #[test]
    fn test_error_messages_name_the_field() {
        assert_eq!(
            CredentialInputError::MissingEmail.to_string(),
            "email is required"
        );
        assert_eq!(
            CredentialInputError::MissingPassword.to_string(),
            "password is required"
        );
    }
}
