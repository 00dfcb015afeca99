// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file, then
//! `LOGIN_GATE_` environment variables (`__` separates nested keys, e.g.
//! `LOGIN_GATE_LOCKOUT__TIERS_SECS=[5,10]`).
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::{Figment, providers::{Env, Format, Serialized, Toml}};
use serde::{Deserialize, Serialize};

use crate::auth::{LockoutPolicy, DEFAULT_TIERS_SECS};
use crate::error::AppError;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LOGIN_GATE_";

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Lockout behaviour
    pub lockout: LockoutSettings,
}

/// Lockout tier table and feedback mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockoutSettings {
    /// Lock durations in seconds, applied at every third failure
    pub tiers_secs: Vec<u64>,
    /// Use one message for unknown identifiers and wrong secrets
    pub uniform_credential_errors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_level: "info".to_string(),
            json_logs: false,
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            lockout: LockoutSettings::default(),
        }
    }
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            tiers_secs: DEFAULT_TIERS_SECS.to_vec(),
            uniform_credential_errors: false,
        }
    }
}

impl Settings {
    /// Load from `config.toml` and the environment
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific TOML file and the environment. A missing file
    /// is not an error; defaults apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the gate cannot run with
    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!("unknown log level '{}'", self.log_level)));
        }
        if self.session_ttl_secs == 0 {
            return Err(AppError::Config("session_ttl_secs must be positive".to_string()));
        }
        self.lockout_policy().map(|_| ())
    }

    pub fn lockout_policy(&self) -> Result<LockoutPolicy, AppError> {
        LockoutPolicy::from_secs(&self.lockout.tiers_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_settings_validation() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());

        let mut invalid = settings.clone();
        invalid.log_level = "loud".to_string();
        assert!(invalid.validate().is_err());

        let mut invalid = settings.clone();
        invalid.session_ttl_secs = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = settings.clone();
        invalid.lockout.tiers_secs.clear();
        assert!(invalid.validate().is_err());

        let mut invalid = settings.clone();
        invalid.lockout.tiers_secs = vec![5, 0];
        assert!(invalid.validate().is_err());

        // Would overflow `Instant` arithmetic on the third failure
        let mut invalid = settings;
        invalid.lockout.tiers_secs = vec![u64::MAX];
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_defaults_when_no_sources() {
        Jail::expect_with(|_jail| {
            let settings = Settings::load().map_err(|e| e.to_string())?;
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.lockout.tiers_secs, vec![5, 10, 30, 60, 120]);
            Ok(())
        });
    }

    #[test]
    fn test_load_settings() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                bind_addr = "0.0.0.0:8080"
                log_level = "debug"
                session_ttl_secs = 3600

                [lockout]
                tiers_secs = [1, 2, 3]
                "#,
            )?;
            jail.set_env("LOGIN_GATE_LOG_LEVEL", "warn");
            jail.set_env("LOGIN_GATE_LOCKOUT__UNIFORM_CREDENTIAL_ERRORS", "true");

            let settings = Settings::load().map_err(|e| e.to_string())?;
            assert_eq!(settings.bind_addr.to_string(), "0.0.0.0:8080");
            assert_eq!(settings.log_level, "warn"); // Environment variable takes precedence
            assert_eq!(settings.session_ttl(), Duration::from_secs(3600));
            assert_eq!(settings.lockout.tiers_secs, vec![1, 2, 3]);
            assert!(settings.lockout.uniform_credential_errors);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_explicit_path_rejects_bad_tiers() {
        Jail::expect_with(|jail| {
            jail.create_file("gate.toml", "[lockout]\ntiers_secs = []\n")?;
            assert!(Settings::load_from("gate.toml").is_err());
            Ok(())
        });
    }
}
