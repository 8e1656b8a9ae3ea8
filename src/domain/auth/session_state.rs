//! Observable sign-in session state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FailureReason;
use crate::domain::foundation::{SessionHandle, StateMachine, ValidationError};

/// Result of a single submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success(SessionHandle),
    Failure(FailureReason),
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success(_))
    }
}

/// The controller's single piece of mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Pending,
    Authenticated(SessionHandle),
    Failed(FailureReason),
}

impl SessionState {
    /// Returns the payload-free phase of this state.
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Pending => SessionPhase::Pending,
            SessionState::Authenticated(_) => SessionPhase::Authenticated,
            SessionState::Failed(_) => SessionPhase::Failed,
        }
    }

    /// Returns true if a new submission may start from this state.
    pub fn accepts_submission(&self) -> bool {
        self.phase().can_transition_to(&SessionPhase::Pending)
    }

    /// Moves to `next` if the phase transition is allowed; otherwise
    /// leaves the state untouched.
    pub fn advance(&mut self, next: SessionState) -> Result<(), ValidationError> {
        self.phase().transition_to(next.phase())?;
        *self = next;
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }

    pub fn session(&self) -> Option<&SessionHandle> {
        match self {
            SessionState::Authenticated(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            SessionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<AuthOutcome> for SessionState {
    fn from(outcome: AuthOutcome) -> Self {
        match outcome {
            AuthOutcome::Success(handle) => SessionState::Authenticated(handle),
            AuthOutcome::Failure(reason) => SessionState::Failed(reason),
        }
    }
}

/// Payload-free projection of [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Pending,
    Authenticated,
    Failed,
}

impl StateMachine for SessionPhase {
    /// Valid transitions:
    /// - Idle | Failed -> Pending (submit)
    /// - Pending -> Authenticated | Failed (outcome)
    /// - any -> Idle (reset)
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (Idle, Pending)
                | (Failed, Pending)
                | (Pending, Authenticated)
                | (Pending, Failed)
                | (_, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            Idle => vec![Pending, Idle],
            Pending => vec![Authenticated, Failed, Idle],
            Authenticated => vec![Idle],
            Failed => vec![Pending, Idle],
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Pending => "pending",
            SessionPhase::Authenticated => "authenticated",
            SessionPhase::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
