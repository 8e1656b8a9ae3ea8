//! Deployment environment

use serde::Deserialize;

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn test_deserializes_lowercase() {
        let env: Environment = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(env, Environment::Production);
        assert!(env.is_production());
        assert!(!Environment::Staging.is_production());
    }
}
