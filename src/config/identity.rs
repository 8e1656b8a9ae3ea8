//! Identity backend configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::environment::Environment;
use super::error::ValidationError;
use crate::adapters::auth::{IdentityToolkitConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_URI};

/// Identity backend configuration (Identity Toolkit REST)
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Web API key of the identity project
    pub api_key: SecretString,

    /// Base URL of the REST API (override for emulators)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Redirect URI reported for federated credentials
    #[serde(default = "default_request_uri")]
    pub request_uri: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl IdentityConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the adapter configuration
    pub fn adapter_config(&self) -> IdentityToolkitConfig {
        IdentityToolkitConfig::new(self.api_key.expose_secret().clone())
            .with_base_url(self.base_url.clone())
            .with_request_uri(self.request_uri.clone())
            .with_timeout(self.request_timeout())
    }

    /// Validate identity configuration
    ///
    /// In production, requires HTTPS for the backend URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("IDENTITY__API_KEY"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if environment.is_production() && !self.base_url.starts_with("https://") {
            return Err(ValidationError::BaseUrlMustBeHttps);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::new(String::new()),
            base_url: default_base_url(),
            request_uri: default_request_uri(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_uri() -> String {
    DEFAULT_REQUEST_URI.to_string()
}

fn default_request_timeout() -> u64 {
    10
}
