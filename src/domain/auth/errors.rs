//! Errors returned across the controller boundary.

use thiserror::Error;

use super::SessionPhase;

/// Misuse of the session controller.
///
/// Provider failures are never reported here; they land in
/// `SessionState::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The requested action is not allowed from the current phase.
    /// State is left unchanged.
    #[error("cannot {action} while session is {from}")]
    InvalidStateTransition {
        from: SessionPhase,
        action: &'static str,
    },
}

impl SessionError {
    pub fn invalid_transition(from: SessionPhase, action: &'static str) -> Self {
        SessionError::InvalidStateTransition { from, action }
    }
}
