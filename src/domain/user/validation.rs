//! User validation utilities

use thiserror::Error;
use validator::ValidateEmail;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("Name must be at least {0} characters")]
    NameTooShort(usize),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),
}

/// Minimum number of characters in a user's name
pub const MIN_NAME_LENGTH: usize = 6;

/// Validate a user ID
///
/// IDs are opaque; the only requirement is that they are not blank.
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.trim().is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    Ok(())
}

/// Validate a user's display name
///
/// Length is counted in characters, not bytes.
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(UserValidationError::NameTooShort(MIN_NAME_LENGTH));
    }

    Ok(())
}

/// Validate email syntax
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !email.validate_email() {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Trim surrounding whitespace and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
