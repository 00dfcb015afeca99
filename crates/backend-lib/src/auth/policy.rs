// ============================
// crates/backend-lib/src/auth/policy.rs
// ============================
//! Escalating lockout tiers.
//!
//! Every third consecutive failure locks the identifier. The first lock uses
//! the first tier, the second lock the second tier and so on; once the table
//! runs out the last tier repeats.
use crate::error::AppError;
use std::time::{Duration, Instant};

use super::AttemptRecord;

/// Number of failures between two lockouts
pub const FAILURES_PER_TIER: u32 = 3;

/// Longest lock a single tier may impose (30 days)
pub const MAX_TIER: Duration = Duration::from_secs(60 * 60 * 24 * 30);

/// Default tier table in seconds
pub const DEFAULT_TIERS_SECS: [u64; 5] = [5, 10, 30, 60, 120];

/// Lockout policy for failed login attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutPolicy {
    tiers: Vec<Duration>,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS_SECS.iter().copied().map(Duration::from_secs).collect(),
        }
    }
}

impl LockoutPolicy {
    /// Build a policy from an ordered tier table. The table must not be empty
    /// and every tier must lie in `(0, MAX_TIER]`.
    pub fn new(tiers: Vec<Duration>) -> Result<Self, AppError> {
        if tiers.is_empty() {
            return Err(AppError::Config("lockout tier table must not be empty".to_string()));
        }
        if tiers.iter().any(Duration::is_zero) {
            return Err(AppError::Config("lockout tiers must be non-zero".to_string()));
        }
        if tiers.iter().any(|t| *t > MAX_TIER) {
            return Err(AppError::Config(format!(
                "lockout tiers must not exceed {} seconds",
                MAX_TIER.as_secs()
            )));
        }
        Ok(Self { tiers })
    }

    /// Build a policy from tier durations in whole seconds
    pub fn from_secs(secs: &[u64]) -> Result<Self, AppError> {
        Self::new(secs.iter().copied().map(Duration::from_secs).collect())
    }

    pub fn tiers(&self) -> &[Duration] {
        &self.tiers
    }

    /// Lock duration imposed when the failure count reaches `count`, if any
    pub fn lockout_for(&self, count: u32) -> Option<Duration> {
        if count == 0 || count % FAILURES_PER_TIER != 0 {
            return None;
        }
        let tier_index = (count / FAILURES_PER_TIER - 1) as usize;
        self.tiers
            .get(tier_index)
            .or_else(|| self.tiers.last())
            .copied()
    }

    /// Record that follows `previous` after one more failure at `now`
    pub fn next_record(&self, previous: &AttemptRecord, now: Instant) -> AttemptRecord {
        let count = previous.count.saturating_add(1);
        AttemptRecord {
            count,
            unlock_at: self.lockout_for(count).map(|d| now + d),
        }
    }
}
