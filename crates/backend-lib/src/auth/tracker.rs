// ============================
// crates/backend-lib/src/auth/tracker.rs
// ============================
//! Per-identifier failed login tracking.
//!
//! Records live in a sharded map. Every read-modify-write happens while the
//! shard guard for that identifier is held, so concurrent failures for one
//! identifier never lose an increment and a clear is never overwritten by a
//! failure computed from the record it replaced. Identifiers in different
//! shards proceed independently.
//!
//! Entries are never evicted: a long-running process holds one record per
//! identifier ever attempted.
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{Clock, LockoutPolicy, SystemClock};

/// Failure state for one identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Failed attempts since the last success
    pub count: u32,
    /// When the current lock lifts, if one was imposed
    pub unlock_at: Option<Instant>,
}

impl AttemptRecord {
    /// Whether the record still blocks attempts at `now`
    pub fn is_locked_at(&self, now: Instant) -> bool {
        self.unlock_at.is_some_and(|t| now < t)
    }

    /// Time left on the lock at `now`
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.unlock_at
            .filter(|t| now < *t)
            .map(|t| t.duration_since(now))
    }
}

/// Tracker for failed authentication attempts
#[derive(Debug, Clone)]
pub struct AttemptTracker {
    records: Arc<DashMap<String, AttemptRecord>>,
    policy: LockoutPolicy,
    clock: Arc<dyn Clock>,
}

impl Default for AttemptTracker {
    fn default() -> Self {
        Self::new(LockoutPolicy::default(), Arc::new(SystemClock))
    }
}

impl AttemptTracker {
    pub fn new(policy: LockoutPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            policy,
            clock,
        }
    }

    /// Current instant according to the tracker's clock
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Current record for `identifier`, or the zero record
    pub fn get(&self, identifier: &str) -> AttemptRecord {
        self.records
            .get(identifier)
            .map(|r| *r)
            .unwrap_or_default()
    }

    /// Count one more failure for `identifier` and return the stored record
    pub fn record_failure(&self, identifier: &str) -> AttemptRecord {
        let now = self.clock.now();
        let mut entry = self.records.entry(identifier.to_string()).or_default();

        let mut next = self.policy.next_record(&entry, now);
        // A failure that raced past the lock check must not lift or shorten a
        // lock that another failure imposed in the meantime.
        if entry.is_locked_at(now) {
            next.unlock_at = next.unlock_at.max(entry.unlock_at);
        }

        *entry = next;
        next
    }

    /// Reset `identifier` to the zero record
    pub fn clear(&self, identifier: &str) {
        if let Some(mut entry) = self.records.get_mut(identifier) {
            *entry = AttemptRecord::default();
        }
    }

    /// Number of identifiers that have ever failed
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ManualClock;
    use std::sync::Barrier;

    fn tracker_with_clock() -> (AttemptTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let tracker = AttemptTracker::new(LockoutPolicy::default(), clock.clone());
        (tracker, clock)
    }

    #[test]
    fn test_unknown_identifier_reads_zero_record() {
        let tracker = AttemptTracker::default();
        assert_eq!(tracker.get("nobody@example.com"), AttemptRecord::default());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_record_failure_counts_and_locks() {
        let (tracker, clock) = tracker_with_clock();
        let id = "user@example.com";

        assert_eq!(tracker.record_failure(id).count, 1);
        assert_eq!(tracker.record_failure(id).count, 2);
        let third = tracker.record_failure(id);
        assert_eq!(third.count, 3);
        assert_eq!(third.remaining(clock.now()), Some(Duration::from_secs(5)));
        assert_eq!(tracker.get(id), third);
    }

    #[test]
    fn test_clear_resets_record() {
        let (tracker, _clock) = tracker_with_clock();
        let id = "user@example.com";
        for _ in 0..3 {
            tracker.record_failure(id);
        }

        tracker.clear(id);

        assert_eq!(tracker.get(id), AttemptRecord::default());
        assert_eq!(tracker.record_failure(id).count, 1);
    }

    #[test]
    fn test_racing_failure_keeps_active_lock() {
        let (tracker, clock) = tracker_with_clock();
        let id = "user@example.com";
        for _ in 0..3 {
            tracker.record_failure(id);
        }

        let fourth = tracker.record_failure(id);
        assert_eq!(fourth.count, 4);
        assert!(fourth.is_locked_at(clock.now()));

        clock.advance(Duration::from_secs(5));
        let fifth = tracker.record_failure(id);
        assert_eq!(fifth.count, 5);
        assert_eq!(fifth.unlock_at, None);
    }

    #[test]
    fn test_racing_failure_never_shortens_lock() {
        let clock = Arc::new(ManualClock::new());
        let policy = LockoutPolicy::from_secs(&[60, 1]).unwrap();
        let tracker = AttemptTracker::new(policy, clock.clone());
        let id = "user@example.com";
        for _ in 0..3 {
            tracker.record_failure(id);
        }

        tracker.record_failure(id);
        tracker.record_failure(id);
        let sixth = tracker.record_failure(id);

        assert_eq!(sixth.count, 6);
        assert_eq!(sixth.remaining(clock.now()), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_identifiers_tracked_separately() {
        let (tracker, clock) = tracker_with_clock();
        for _ in 0..3 {
            tracker.record_failure("a@example.com");
        }

        assert!(tracker.get("a@example.com").is_locked_at(clock.now()));
        assert_eq!(tracker.get("b@example.com").count, 0);
    }

    #[test]
    fn test_concurrent_failures_lose_no_increments() {
        const THREADS: usize = 50;
        let (tracker, _clock) = tracker_with_clock();
        let barrier = Barrier::new(THREADS);

        std::thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    barrier.wait();
                    tracker.record_failure("shared@example.com");
                });
            }
        });

        assert_eq!(tracker.get("shared@example.com").count, THREADS as u32);
    }
}
