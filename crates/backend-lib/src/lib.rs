// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Login gate: per-identifier failed attempt tracking with escalating
//! lockouts in front of credential verification.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod validation;

use std::sync::Arc;
use crate::auth::{AttemptTracker, AuthGate, Clock, CredentialVerifier, SessionManager, SystemClock};
use crate::config::Settings;
use crate::error::AppError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// The login gate
    pub gate: AuthGate,
    /// Session manager backing the gate's session issuer
    pub sessions: SessionManager,
    /// Loaded settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state on the wall clock
    pub fn new(settings: Settings, credentials: Arc<dyn CredentialVerifier>) -> Result<Self, AppError> {
        Self::with_clock(settings, credentials, Arc::new(SystemClock))
    }

    /// Create a new application state with an explicit time source
    pub fn with_clock(
        settings: Settings,
        credentials: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        settings.validate()?;

        let tracker = Arc::new(AttemptTracker::new(settings.lockout_policy()?, clock));
        let sessions = SessionManager::new(settings.session_ttl());
        let gate = AuthGate::new(tracker, credentials, Arc::new(sessions.clone()))
            .with_uniform_errors(settings.lockout.uniform_credential_errors);

        Ok(Self {
            gate,
            sessions,
            settings: Arc::new(settings),
        })
    }
}
