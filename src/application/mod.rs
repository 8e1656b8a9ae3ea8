//! Application layer - orchestrates domain state and ports.
//!
//! The only use case here is signing a user in; [`AuthSessionController`]
//! owns the session state and drives the `AuthProvider` port.

mod session_controller;

pub use session_controller::{AuthSessionController, ControllerOptions};
