// ============================
// crates/backend-lib/src/auth/gate.rs
// ============================
//! The login gate.
//!
//! An identifier is either unlocked or locked for some number of seconds.
//! That state is never stored: it is derived from the tracker's `unlock_at`
//! each time an attempt arrives, so an expired lock simply stops applying.
//!
//! Order of checks for one attempt:
//!
//! 1. input shape (never counted)
//! 2. active lock (verification skipped, nothing counted)
//! 3. credential verification
//! 4. success clears the record and issues a session; a rejection is counted
//!    and may impose the next lock
//!
//! Collaborator errors become `Outcome::UpstreamError` and are not counted.
use gate_common::{FieldErrors, Outcome};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{AttemptTracker, CredentialVerifier, SessionIssuer};
use crate::metrics::{
    LOCKOUT_IMPOSED, LOGIN_ATTEMPT, LOGIN_FAILED, LOGIN_LOCKED, LOGIN_SUCCESS, UPSTREAM_ERROR,
};
use crate::validation;

pub const UNKNOWN_IDENTIFIER_MSG: &str = "Email not found";
pub const WRONG_SECRET_MSG: &str = "Password is incorrect";
pub const UNIFORM_REJECTION_MSG: &str = "Invalid email or password";

/// Orchestrates lock checks, verification and session issuance
#[derive(Clone)]
pub struct AuthGate {
    tracker: Arc<AttemptTracker>,
    verifier: Arc<dyn CredentialVerifier>,
    sessions: Arc<dyn SessionIssuer>,
    uniform_errors: bool,
}

impl AuthGate {
    pub fn new(
        tracker: Arc<AttemptTracker>,
        verifier: Arc<dyn CredentialVerifier>,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            tracker,
            verifier,
            sessions,
            uniform_errors: false,
        }
    }

    /// Report unknown identifiers and wrong secrets with the same message.
    ///
    /// Off by default, which lets a caller learn whether an identifier exists.
    pub fn with_uniform_errors(mut self, uniform: bool) -> Self {
        self.uniform_errors = uniform;
        self
    }

    pub fn tracker(&self) -> &AttemptTracker {
        &self.tracker
    }

    /// Run one login attempt
    #[tracing::instrument(name = "login.attempt", skip_all, fields(identifier = %identifier))]
    pub async fn attempt(&self, identifier: &str, secret: &str) -> Outcome {
        counter!(LOGIN_ATTEMPT).increment(1);

        if let Err(errors) = validation::validate_login(identifier, secret) {
            debug!("rejected malformed login input");
            return Outcome::FieldError(errors);
        }

        let record = self.tracker.get(identifier);
        if let Some(remaining) = record.remaining(self.tracker.now()) {
            counter!(LOGIN_LOCKED).increment(1);
            debug!(count = record.count, "attempt rejected while locked");
            return locked(remaining);
        }

        let verification = match self.verifier.verify(identifier, secret).await {
            Ok(v) => v,
            Err(e) => {
                counter!(UPSTREAM_ERROR).increment(1);
                error!(error = %e, "credential verification failed");
                return Outcome::UpstreamError { message: e.to_string() };
            },
        };

        if verification.accepted() {
            self.tracker.clear(identifier);
            return match self.sessions.create_session(identifier).await {
                Ok(_) => {
                    counter!(LOGIN_SUCCESS).increment(1);
                    info!("login succeeded");
                    Outcome::Success
                },
                Err(e) => {
                    counter!(UPSTREAM_ERROR).increment(1);
                    error!(error = %e, "session issuance failed");
                    Outcome::UpstreamError { message: e.to_string() }
                },
            };
        }

        counter!(LOGIN_FAILED).increment(1);
        let updated = self.tracker.record_failure(identifier);
        warn!(count = updated.count, found = verification.found, "login failed");

        if let Some(remaining) = updated.remaining(self.tracker.now()) {
            counter!(LOCKOUT_IMPOSED).increment(1);
            info!(count = updated.count, secs = remaining.as_secs(), "lockout imposed");
            return locked(remaining);
        }

        Outcome::FieldError(self.rejection(verification.found))
    }

    fn rejection(&self, found: bool) -> FieldErrors {
        if self.uniform_errors {
            FieldErrors::secret(UNIFORM_REJECTION_MSG)
        } else if found {
            FieldErrors::secret(WRONG_SECRET_MSG)
        } else {
            FieldErrors::identifier(UNKNOWN_IDENTIFIER_MSG)
        }
    }
}

/// Whole seconds left on a lock, rounded up
pub fn seconds_remaining(remaining: Duration) -> u64 {
    let secs = remaining.as_nanos().div_ceil(1_000_000_000);
    u64::try_from(secs).unwrap_or(u64::MAX).max(1)
}

fn locked(remaining: Duration) -> Outcome {
    Outcome::Locked {
        seconds_remaining: seconds_remaining(remaining),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_remaining_rounds_up() {
        assert_eq!(seconds_remaining(Duration::from_secs(5)), 5);
        assert_eq!(seconds_remaining(Duration::from_millis(4001)), 5);
        assert_eq!(seconds_remaining(Duration::from_millis(3999)), 4);
        assert_eq!(seconds_remaining(Duration::from_nanos(1)), 1);
    }
}
