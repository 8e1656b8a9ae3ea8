//! State machine trait for phase enums.
//!
//! Gives payload-free phase enums (such as `SessionPhase`) a uniform way to
//! describe and validate their transitions.

use super::ValidationError;

/// Trait for phase enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for SessionPhase {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Idle, Pending) | (Pending, Authenticated) | (_, Idle))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Idle => vec![Pending, Idle],
///             // ...
///         }
///     }
/// }
///
/// let next = SessionPhase::Idle.transition_to(SessionPhase::Pending)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
