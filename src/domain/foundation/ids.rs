//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Number of leading characters of a session handle shown in debug output.
const HANDLE_DEBUG_PREFIX: usize = 6;

/// Opaque session identifier issued by the identity provider.
///
/// The handle may be a bearer token, so `Debug` only shows a short prefix
/// and there is deliberately no `Display` impl.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionHandle(String);

impl SessionHandle {
    /// Creates a new SessionHandle, returning error if empty.
    pub fn new(handle: impl Into<String>) -> Result<Self, ValidationError> {
        let handle = handle.into();
        if handle.trim().is_empty() {
            return Err(ValidationError::empty_field("session_handle"));
        }
        Ok(Self(handle))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(HANDLE_DEBUG_PREFIX).collect();
        if self.0.chars().count() > HANDLE_DEBUG_PREFIX {
            write!(f, "SessionHandle({}…)", prefix)
        } else {
            write!(f, "SessionHandle({})", prefix)
        }
    }
}

/// Identifier of a federated identity provider (e.g. "google", "google.com").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    /// Creates a new ProviderId, rejecting empty or whitespace-containing ids.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("provider_id"));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "provider_id",
                "must not contain whitespace",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ProviderId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        id.0
    }
}

/// Unique identifier for a single sign-in attempt, used for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Creates a new random AttemptId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
