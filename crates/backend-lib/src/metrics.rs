// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_ATTEMPT: &str = "login.attempt";
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_FAILED: &str = "login.failed";
pub const LOGIN_LOCKED: &str = "login.locked";
pub const LOCKOUT_IMPOSED: &str = "login.lockout_imposed";
pub const UPSTREAM_ERROR: &str = "login.upstream_error";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
