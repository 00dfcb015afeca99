// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod clock;
pub mod credentials;
pub mod gate;
pub mod password;
pub mod policy;
pub mod session;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::{CredentialVerifier, InMemoryCredentialStore, Verification};
pub use gate::AuthGate;
pub use password::{hash_password, verify_password};
pub use policy::{LockoutPolicy, DEFAULT_TIERS_SECS, FAILURES_PER_TIER};
pub use session::{Session, SessionIssuer, SessionManager, SessionToken, SESSION_TTL};
pub use tracker::{AttemptRecord, AttemptTracker};
