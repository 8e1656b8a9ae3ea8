//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `AUTH_SESSION` prefix
//! and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use auth_session::config::{init_logging, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_logging(&config.logging).expect("Failed to initialize logging");
//! ```

mod environment;
mod error;
mod identity;
mod logging;
mod session;

pub use environment::Environment;
pub use error::{ConfigError, ValidationError};
pub use identity::IdentityConfig;
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    /// Identity backend (Identity Toolkit REST)
    pub identity: IdentityConfig,

    /// Session controller tunables
    #[serde(default)]
    pub session: SessionConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads variables such as:
    ///
    /// - `AUTH_SESSION__IDENTITY__API_KEY=...` -> `identity.api_key`
    /// - `AUTH_SESSION__SESSION__ATTEMPT_TIMEOUT_SECS=30` -> `session.attempt_timeout_secs`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AUTH_SESSION")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.identity.validate(&self.environment)?;
        self.session.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "AUTH_SESSION__IDENTITY__API_KEY",
        "AUTH_SESSION__IDENTITY__BASE_URL",
        "AUTH_SESSION__ENVIRONMENT",
        "AUTH_SESSION__SESSION__ATTEMPT_TIMEOUT_SECS",
        "AUTH_SESSION__LOGGING__FORMAT",
    ];

    fn set_minimal_env() {
        env::set_var("AUTH_SESSION__IDENTITY__API_KEY", "AIza-test-key");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.identity.api_key.expose_secret(), "AIza-test-key");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.session.attempt_timeout_secs, None);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_identity_section_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("AUTH_SESSION__SESSION__ATTEMPT_TIMEOUT_SECS", "30");
        env::set_var("AUTH_SESSION__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.session.controller_options().attempt_timeout,
            Some(Duration::from_secs(30))
        );
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_production_requires_https_backend() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("AUTH_SESSION__ENVIRONMENT", "production");
        env::set_var("AUTH_SESSION__IDENTITY__BASE_URL", "http://localhost:9099/v1");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(config.validate(), Err(ValidationError::BaseUrlMustBeHttps));
    }
}
