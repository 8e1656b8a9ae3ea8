//! Port for the interactive half of federated sign-in.
//!
//! A REST identity backend cannot open a browser popup itself. The
//! presentation layer implements this port: it shows the identity provider's
//! consent screen and hands back whatever credential the provider issued.

use async_trait::async_trait;
use secrecy::SecretString;

use super::ProviderError;
use crate::domain::foundation::ProviderId;

/// Kind of token returned by the federated identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdpTokenKind {
    IdToken,
    AccessToken,
}

impl IdpTokenKind {
    /// Parameter name used in an identity backend `postBody`.
    pub fn param_name(&self) -> &'static str {
        match self {
            IdpTokenKind::IdToken => "id_token",
            IdpTokenKind::AccessToken => "access_token",
        }
    }
}

/// Credential obtained from a federated identity provider.
#[derive(Debug, Clone)]
pub struct IdpCredential {
    /// Canonical identity provider id understood by the backend (e.g. "google.com").
    pub provider_id: ProviderId,
    pub kind: IdpTokenKind,
    pub token: SecretString,
}

impl IdpCredential {
    pub fn new(provider_id: ProviderId, kind: IdpTokenKind, token: impl Into<String>) -> Self {
        Self {
            provider_id,
            kind,
            token: SecretString::new(token.into()),
        }
    }
}

/// Obtains a federated credential, typically by showing a popup.
///
/// # Contract
///
/// - Return `popup-closed-by-user` if the user dismisses the popup
/// - Return any other code for provider-side refusals
#[async_trait]
pub trait FederatedCredentialSource: Send + Sync {
    async fn obtain_credential(
        &self,
        provider_id: &ProviderId,
    ) -> Result<IdpCredential, ProviderError>;
}
