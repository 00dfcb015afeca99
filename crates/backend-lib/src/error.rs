// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Credential store error: {0}")]
    CredentialStore(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Identifier already registered: {0}")]
    AlreadyRegistered(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AlreadyRegistered(_) => StatusCode::CONFLICT,
            AppError::CredentialStore(_) | AppError::Session(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::CredentialStore(_) => "UPSTREAM_001",
            AppError::Session(_) => "UPSTREAM_002",
            AppError::PasswordHash(_) => "AUTH_001",
            AppError::Config(_) => "CFG_001",
            AppError::AlreadyRegistered(_) => "VAL_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::CredentialStore(_) | AppError::Session(_) | AppError::PasswordHash(_) => {
                "Authentication failed, please try again later".to_string()
            },
            AppError::AlreadyRegistered(_) => "This email is already registered.".to_string(),
            AppError::Config(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<scrypt::password_hash::Error> for AppError {
    fn from(err: scrypt::password_hash::Error) -> Self {
        AppError::PasswordHash(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::CredentialStore(format!("verification task failed: {err}"))
    }
}
