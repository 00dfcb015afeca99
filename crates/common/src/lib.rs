// ================
// common/src/lib.rs
// ================
//! Common types shared between the login gate and whatever request layer
//! sits in front of it. These are the JSON shapes of a login request and
//! of the gate's answer.

use serde::{Deserialize, Serialize};

/// Credentials submitted by a client
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    /// Account identifier (an email address)
    #[serde(default)]
    pub email: String,
    /// Secret being verified
    #[serde(default)]
    pub password: String,
}

/// Per-field feedback for a rejected attempt
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    /// Problem with the identifier, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub identifier_error: Option<String>,
    /// Problem with the secret, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secret_error: Option<String>,
}

impl FieldErrors {
    /// Feedback pointing at the identifier field only
    pub fn identifier(msg: impl Into<String>) -> Self {
        Self {
            identifier_error: Some(msg.into()),
            secret_error: None,
        }
    }

    /// Feedback pointing at the secret field only
    pub fn secret(msg: impl Into<String>) -> Self {
        Self {
            identifier_error: None,
            secret_error: Some(msg.into()),
        }
    }

    /// True when neither field carries an error
    pub fn is_empty(&self) -> bool {
        self.identifier_error.is_none() && self.secret_error.is_none()
    }
}

/// Result of a single login attempt
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    /// Credentials accepted and a session was issued
    Success,
    /// The identifier is locked out; only a countdown is disclosed
    #[serde(rename_all = "camelCase")]
    Locked {
        /// Whole seconds until the lock lifts, always at least 1
        seconds_remaining: u64,
    },
    /// Malformed input or rejected credentials
    FieldError(FieldErrors),
    /// A collaborator failed before the attempt could complete
    UpstreamError {
        /// Description of the failure
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_outcome_uses_camel_case() {
        let json = serde_json::to_value(Outcome::Locked { seconds_remaining: 5 }).unwrap();
        assert_eq!(json["outcome"], "locked");
        assert_eq!(json["secondsRemaining"], 5);
    }

    #[test]
    fn field_error_omits_missing_fields() {
        let json = serde_json::to_value(Outcome::FieldError(FieldErrors::secret(
            "Password is incorrect",
        )))
        .unwrap();
        assert_eq!(json["outcome"], "fieldError");
        assert_eq!(json["secretError"], "Password is incorrect");
        assert!(json.get("identifierError").is_none());
    }

    #[test]
    fn login_request_tolerates_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert_eq!(req.email, "a@b.co");
        assert!(req.password.is_empty());
    }
}
