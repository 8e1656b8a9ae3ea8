//! Domain layer containing sign-in types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, validation errors, state machine trait)
//! - `auth` - Credentials, session states and provider code mapping

pub mod auth;
pub mod foundation;
