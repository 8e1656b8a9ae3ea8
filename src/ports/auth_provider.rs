//! Auth provider port for credential verification.
//!
//! The identity backend owns password checks, session issuance and the
//! federated popup handshake. The controller only sees this trait, so a
//! different vendor, or an in-memory mock, can be swapped in without touching
//! session logic.
//!
//! # Example
//!
//! ```ignore
//! async fn sign_in(
//!     provider: Arc<dyn AuthProvider>,
//!     creds: &Credentials,
//! ) -> Result<SessionHandle, ProviderError> {
//!     provider
//!         .sign_in_with_password(creds.email(), creds.password())
//!         .await
//! }
//! ```

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::auth::codes;
use crate::domain::foundation::{ProviderId, SessionHandle};

/// Failure reported by the identity provider.
///
/// `code` is a lower-kebab-case identifier (optionally `auth/`-prefixed).
/// Adapters translate transport problems into codes too, so every failure
/// is representable here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("auth provider error: {code}")]
pub struct ProviderError {
    pub code: String,
    pub message: Option<String>,
}

impl ProviderError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: None,
        }
    }

    /// Attaches a diagnostic message. Never shown to users.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(codes::NETWORK_REQUEST_FAILED).with_message(message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR).with_message(message)
    }

    pub fn timeout() -> Self {
        Self::new(codes::TIMEOUT)
    }

    pub fn popup_closed() -> Self {
        Self::new(codes::POPUP_CLOSED_BY_USER)
    }
}

/// Signs users in against an external identity backend.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(SessionHandle)` when the backend issues a session
/// - Return `wrong-password`, `user-not-found` or `invalid-email` for the
///   corresponding password failures
/// - Return `popup-closed-by-user` when the user dismisses the federated popup
/// - Map transport failures to `network-request-failed`, `timeout` or
///   `internal-error` rather than panicking
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify an email/password pair.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionHandle, ProviderError>;

    /// Run the federated popup flow for the given identity provider.
    async fn sign_in_with_popup(
        &self,
        provider_id: &ProviderId,
    ) -> Result<SessionHandle, ProviderError>;
}
