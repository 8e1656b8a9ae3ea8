//! Auth module - sign-in session vocabulary.
//!
//! Credentials go in, an [`AuthOutcome`] comes back from the provider, and
//! the controller folds it into a [`SessionState`]. Provider error codes are
//! normalized into a [`FailureReason`] through a static table.

pub mod codes;
mod credentials;
mod errors;
mod failure;
mod session_state;

pub use credentials::Credentials;
pub use errors::SessionError;
pub use failure::{FailureReason, SignInMethod};
pub use session_state::{AuthOutcome, SessionPhase, SessionState};
