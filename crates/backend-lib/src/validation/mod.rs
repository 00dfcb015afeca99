// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Login input validation.
//!
//! Shape checks only. Nothing here looks at stored credentials or the
//! attempt tracker, so a malformed submission is never counted.

use gate_common::FieldErrors;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static email pattern")
});

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password is required")]
    MissingPassword,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(email)
}

/// Validate that a secret was supplied
pub fn validate_secret(secret: &str) -> ValidationResult<&str> {
    if secret.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(secret)
}

/// Check both login fields, reporting every problem at once
pub fn validate_login(email: &str, secret: &str) -> Result<(), FieldErrors> {
    let errors = FieldErrors {
        identifier_error: validate_email(email).err().map(|e| e.to_string()),
        secret_error: validate_secret(secret).err().map(|e| e.to_string()),
    };

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
