use thiserror::Error;

/// Fixed message for failed logins. Unknown email, wrong password and a
/// structurally invalid stored hash must be indistinguishable from the
/// outside, so every authentication failure carries this exact text.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Hashing error: {message}")]
    Hashing { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Conflict on the email unique constraint. Single source of the wording
    /// so the pre-check and the storage-level duplicate detection report the
    /// same message.
    pub fn email_conflict(email: &str) -> Self {
        Self::conflict(format!("account with email '{}' already exists", email))
    }

    /// Conflict on the username unique constraint.
    pub fn username_conflict(username: &str) -> Self {
        Self::conflict(format!(
            "account with username '{}' already exists",
            username
        ))
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// The one authentication failure the login flow is allowed to return.
    pub fn invalid_credentials() -> Self {
        Self::authentication(INVALID_CREDENTIALS_MESSAGE)
    }

    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
