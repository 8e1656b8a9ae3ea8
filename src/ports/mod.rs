//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AuthProvider` - identity backend that verifies credentials
//! - `FederatedCredentialSource` - popup that yields a federated credential

mod auth_provider;
mod federated_credential_source;

pub use auth_provider::{AuthProvider, ProviderError};
pub use federated_credential_source::{FederatedCredentialSource, IdpCredential, IdpTokenKind};
