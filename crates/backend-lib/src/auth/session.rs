// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
use async_trait::async_trait;
use metrics::{counter, gauge};
use std::{collections::HashMap, fmt, sync::Arc, time::{Duration, SystemTime}};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED};

/// Session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// Opaque token handed to an authenticated client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(pub String);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Establishes an authenticated session for a verified identifier
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn create_session(&self, identifier: &str) -> Result<SessionToken, AppError>;
}

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    pub identifier: String,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

/// Session manager for handling authentication tokens
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Get a session by token
    pub async fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(token).cloned()
    }

    /// Validate a session token
    pub async fn validate_session(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .is_some_and(|session| SystemTime::now() < session.expires_at)
    }

    /// Drop a session, returning whether it existed
    pub async fn revoke(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(token).is_some();
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        removed
    }

    /// Remove expired sessions, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = SystemTime::now();
        let before_count = sessions.len();

        sessions.retain(|_, session| now < session.expires_at);

        let removed = before_count - sessions.len();
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Periodically purge expired sessions; runs until the task is dropped
    pub async fn cleanup_task(self, interval: Duration) {
        loop {
            tokio::time::sleep(interval).await;
            let removed = self.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "purged expired sessions");
            }
        }
    }
}

#[async_trait]
impl SessionIssuer for SessionManager {
    async fn create_session(&self, identifier: &str) -> Result<SessionToken, AppError> {
        let token = Uuid::new_v4().to_string();
        let now = SystemTime::now();
        let session = Session {
            identifier: identifier.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);

        Ok(SessionToken(token))
    }
}
