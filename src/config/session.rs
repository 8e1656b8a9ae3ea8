//! Session controller configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::ControllerOptions;

/// Session controller configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Abandon a provider call after this many seconds; unset waits forever
    #[serde(default)]
    pub attempt_timeout_secs: Option<u64>,
}

impl SessionConfig {
    /// Builds controller options from this section
    pub fn controller_options(&self) -> ControllerOptions {
        match self.attempt_timeout_secs {
            Some(secs) => ControllerOptions::default().with_attempt_timeout(Duration::from_secs(secs)),
            None => ControllerOptions::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.attempt_timeout_secs {
            Some(0) => Err(ValidationError::InvalidTimeout),
            Some(secs) if secs > 300 => Err(ValidationError::InvalidTimeout),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_timeout() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.controller_options().attempt_timeout, None);
    }

    #[test]
    fn test_timeout_converts_to_duration() {
        let config = SessionConfig {
            attempt_timeout_secs: Some(15),
        };
        assert_eq!(
            config.controller_options().attempt_timeout,
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn test_validation_invalid_timeout() {
        assert!(SessionConfig {
            attempt_timeout_secs: Some(0)
        }
        .validate()
        .is_err());
        assert!(SessionConfig {
            attempt_timeout_secs: Some(301)
        }
        .validate()
        .is_err());
    }
}
