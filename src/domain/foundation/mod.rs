//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the state machine trait, and the validation error
//! used when constructing value objects.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::{AttemptId, ProviderId, SessionHandle};
pub use state_machine::StateMachine;
