// ============================
// crates/backend-lib/src/auth/credentials.rs
// ============================
//! Credential verification.
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use zeroize::Zeroize;

use super::password::{hash_password_secure, verify_password};
use crate::error::AppError;

/// Result of checking an identifier/secret pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verification {
    /// The identifier is known
    pub found: bool,
    /// The secret matched the stored credential
    pub matches: bool,
}

impl Verification {
    pub const NOT_FOUND: Self = Self { found: false, matches: false };
    pub const MISMATCH: Self = Self { found: true, matches: false };
    pub const MATCH: Self = Self { found: true, matches: true };

    pub fn accepted(&self) -> bool {
        self.found && self.matches
    }
}

/// Checks submitted credentials against stored ones.
///
/// An unknown identifier or a wrong secret is a normal `Ok` result. `Err` is
/// reserved for infrastructure failures.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, identifier: &str, secret: &str) -> Result<Verification, AppError>;
}

/// Credential store held in memory, keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    hashes: Arc<DashMap<String, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new credential; the plain secret is wiped once hashed
    pub fn register(&self, identifier: &str, mut secret: String) -> Result<(), AppError> {
        if self.hashes.contains_key(identifier) {
            secret.zeroize();
            return Err(AppError::AlreadyRegistered(identifier.to_string()));
        }

        // Hash outside the map so the shard is not held during scrypt
        let hash = hash_password_secure(&mut secret)?;
        match self.hashes.entry(identifier.to_string()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegistered(identifier.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(hash);
                Ok(())
            },
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.hashes.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryCredentialStore {
    async fn verify(&self, identifier: &str, secret: &str) -> Result<Verification, AppError> {
        // Clone out of the map so no shard guard is held across the await
        let Some(hash) = self.hashes.get(identifier).map(|h| h.clone()) else {
            return Ok(Verification::NOT_FOUND);
        };

        let secret = secret.to_string();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&hash, &secret)).await??;

        Ok(if matches {
            Verification::MATCH
        } else {
            Verification::MISMATCH
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_distinguishes_unknown_and_wrong_secret() {
        let store = InMemoryCredentialStore::new();
        store
            .register("dev@test.com", "SecureP@ssw0rd".to_string())
            .unwrap();

        assert_eq!(
            store.verify("dev@test.com", "SecureP@ssw0rd").await.unwrap(),
            Verification::MATCH
        );
        assert_eq!(
            store.verify("dev@test.com", "nope").await.unwrap(),
            Verification::MISMATCH
        );
        assert_eq!(
            store.verify("ghost@test.com", "SecureP@ssw0rd").await.unwrap(),
            Verification::NOT_FOUND
        );
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let store = InMemoryCredentialStore::new();
        store.register("dev@test.com", "first-secret".to_string()).unwrap();

        let err = store
            .register("dev@test.com", "second-secret".to_string())
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyRegistered(_)));
        assert_eq!(store.len(), 1);
    }
}
