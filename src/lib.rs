//! Auth Session - sign-in session controller
//!
//! Drives a single user's sign-in through an `Idle -> Pending ->
//! Authenticated | Failed` state machine on top of a pluggable identity
//! provider. Provider error codes are translated into a closed set of
//! user-facing failure reasons.
//!
//! # Layers
//!
//! - `domain` - session states, credentials and failure mapping
//! - `ports` - the identity provider interfaces
//! - `application` - [`application::AuthSessionController`]
//! - `adapters` - in-memory and Identity Toolkit REST providers
//! - `config` - environment-driven configuration and logging setup

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
