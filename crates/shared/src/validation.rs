//! Common validation logic shared by the API and domain layers.

use thiserror::Error;

/// Maximum length for usernames.
pub const MAX_USERNAME_LENGTH: usize = 80;
/// Maximum length for request subjects.
pub const MAX_SUBJECT_LENGTH: usize = 200;
/// Maximum length for display/full names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Validation error with a field name and message.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validates a username: non-empty, length-bounded, no whitespace.
pub fn validate_username(username: &str) -> Result<(), FieldError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new("username", "must not be empty"));
    }
    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(FieldError::new(
            "username",
            format!("must be at most {} characters", MAX_USERNAME_LENGTH),
        ));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(FieldError::new("username", "must not contain whitespace"));
    }
    Ok(())
}

/// Validates an email address using the WHATWG rules from the validator crate.
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if validator::ValidateEmail::validate_email(&email) {
        Ok(())
    } else {
        Err(FieldError::new("email", "is not a valid email address"))
    }
}

/// Validates a maintenance request subject line.
pub fn validate_subject(subject: &str) -> Result<(), FieldError> {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new("subject", "must not be empty"));
    }
    if trimmed.len() > MAX_SUBJECT_LENGTH {
        return Err(FieldError::new(
            "subject",
            format!("must be at most {} characters", MAX_SUBJECT_LENGTH),
        ));
    }
    Ok(())
}

/// Validates a generic display name (team, category, company, ...).
pub fn validate_name(name: &str) -> Result<(), FieldError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new("name", "must not be empty"));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(FieldError::new(
            "name",
            format!("must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("tech_anna").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(81)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("worker@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_subject() {
        assert!(validate_subject("Conveyor belt jammed").is_ok());
        assert!(validate_subject(" ").is_err());
        assert!(validate_subject(&"s".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Mechanical Team").is_ok());
        assert!(validate_name("").is_err());
    }
}
