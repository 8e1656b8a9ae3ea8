//! Authentication adapters.
//!
//! Implementations of the `AuthProvider` and `FederatedCredentialSource` ports:
//!
//! - `mock` - In-memory implementations that don't require external services
//! - `identity_toolkit` - REST identity backend (Identity Toolkit v1 wire format)

mod identity_toolkit;
mod mock;

pub use identity_toolkit::{
    IdentityToolkitConfig, IdentityToolkitProvider, DEFAULT_BASE_URL, DEFAULT_REQUEST_URI,
};
pub use mock::{MockAuthProvider, StaticCredentialSource};
