//! Normalized sign-in failure reasons and the provider code table.

use serde::Serialize;
use std::fmt;

use super::codes;
use crate::domain::foundation::ProviderId;

/// Why a sign-in attempt failed, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "reason", content = "code", rename_all = "snake_case")]
pub enum FailureReason {
    InvalidCredentials,
    UserNotFound,
    InvalidEmailFormat,
    PopupDismissed,
    /// Any provider code without a dedicated reason, preserved verbatim.
    ProviderError(String),
}

/// Provider code to failure reason. Codes not listed map to
/// `FailureReason::ProviderError(code)`.
const PROVIDER_CODE_TABLE: &[(&str, FailureReason)] = &[
    (codes::WRONG_PASSWORD, FailureReason::InvalidCredentials),
    (codes::USER_NOT_FOUND, FailureReason::UserNotFound),
    (codes::INVALID_EMAIL, FailureReason::InvalidEmailFormat),
    (codes::POPUP_CLOSED_BY_USER, FailureReason::PopupDismissed),
];

/// How the user tried to sign in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignInMethod {
    Password,
    Federated(ProviderId),
}

impl SignInMethod {
    /// Short label used in log records.
    pub fn label(&self) -> &'static str {
        match self {
            SignInMethod::Password => "password",
            SignInMethod::Federated(_) => "federated",
        }
    }
}

impl fmt::Display for SignInMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignInMethod::Password => write!(f, "password"),
            SignInMethod::Federated(provider) => write!(f, "federated:{}", provider),
        }
    }
}

impl FailureReason {
    /// Maps a provider error code through the static table.
    ///
    /// Total and deterministic. An `auth/` prefix is ignored for the lookup;
    /// unmapped codes are returned verbatim inside `ProviderError`.
    pub fn from_provider_code(code: &str) -> Self {
        let key = codes::strip_namespace(code);
        PROVIDER_CODE_TABLE
            .iter()
            .find(|(known, _)| *known == key)
            .map(|(_, reason)| reason.clone())
            .unwrap_or_else(|| FailureReason::ProviderError(code.to_string()))
    }

    /// Maps a provider error code for the given sign-in method.
    ///
    /// Password sign-in uses the full table. Federated sign-in only
    /// recognises a dismissed popup; everything else is a `ProviderError`.
    pub fn classify(method: &SignInMethod, code: &str) -> Self {
        match method {
            SignInMethod::Password => Self::from_provider_code(code),
            SignInMethod::Federated(_) => {
                if codes::strip_namespace(code) == codes::POPUP_CLOSED_BY_USER {
                    FailureReason::PopupDismissed
                } else {
                    FailureReason::ProviderError(code.to_string())
                }
            }
        }
    }

    /// Message suitable for an inline error under the sign-in form.
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureReason::InvalidCredentials => "Incorrect Password!",
            FailureReason::UserNotFound => "No user with that email found!",
            FailureReason::InvalidEmailFormat => "Must enter a valid email!",
            FailureReason::PopupDismissed => "Popup closed before signing in user!",
            FailureReason::ProviderError(_) => "Error signing in user!",
        }
    }

    /// Returns the raw provider code for `ProviderError`, otherwise `None`.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            FailureReason::ProviderError(code) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InvalidCredentials => write!(f, "invalid credentials"),
            FailureReason::UserNotFound => write!(f, "user not found"),
            FailureReason::InvalidEmailFormat => write!(f, "invalid email format"),
            FailureReason::PopupDismissed => write!(f, "popup dismissed"),
            FailureReason::ProviderError(code) => write!(f, "provider error: {}", code),
        }
    }
}
