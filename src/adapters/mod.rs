//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Identity backends (in-memory mock, Identity Toolkit REST)

pub mod auth;

pub use auth::{IdentityToolkitProvider, MockAuthProvider, StaticCredentialSource};
