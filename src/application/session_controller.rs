//! AuthSessionController - mediates between a sign-in form and an `AuthProvider`.
//!
//! The controller owns a single [`SessionState`] cell. Submissions move it to
//! `Pending`, call the provider, and fold the result back in:
//!
//! ```text
//! Idle --submit--> Pending --success--> Authenticated
//!                  Pending --failure--> Failed(reason) --submit--> Pending
//! (any) --reset--> Idle
//! ```
//!
//! The state cell is a `tokio::sync::watch` channel, so a presentation layer
//! can either take snapshots with [`AuthSessionController::state`] or await
//! changes through [`AuthSessionController::subscribe`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::Instrument;

use crate::domain::auth::{
    AuthOutcome, Credentials, FailureReason, SessionError, SessionPhase, SessionState,
    SignInMethod,
};
use crate::domain::foundation::{AttemptId, ProviderId, SessionHandle, StateMachine};
use crate::ports::{AuthProvider, ProviderError};

/// Tunables for [`AuthSessionController`].
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Upper bound on a single provider call. `None` waits indefinitely.
    pub attempt_timeout: Option<Duration>,
}

impl ControllerOptions {
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }
}

/// A submission that has moved the session to `Pending`.
struct Attempt {
    id: AttemptId,
    generation: u64,
    method: SignInMethod,
}

/// Sign-in state machine over an external identity provider.
///
/// The `Pending` check and the transition happen in one step on the state
/// cell, so only one submission is accepted at a time. `reset()` while
/// `Pending` cancels the in-flight attempt: its provider call is dropped and
/// its outcome never reaches the state. A submission made right after the
/// reset waits for that drop before calling the provider, so at most one
/// provider call is ever running.
pub struct AuthSessionController {
    provider: Arc<dyn AuthProvider>,
    options: ControllerOptions,
    state: watch::Sender<SessionState>,
    /// Bumped on every submission and reset; only mutated under the state lock.
    generation: AtomicU64,
    /// Held for the lifetime of a provider call.
    provider_slot: Mutex<()>,
}

impl AuthSessionController {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self::with_options(provider, ControllerOptions::default())
    }

    pub fn with_options(provider: Arc<dyn AuthProvider>, options: ControllerOptions) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            provider,
            options,
            state,
            generation: AtomicU64::new(0),
            provider_slot: Mutex::new(()),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Signs in with email and password.
    ///
    /// Resolves once the provider has answered and returns the resulting
    /// state. Fails only if the session is not `Idle` or `Failed`, in which
    /// case nothing changes and the provider is not called.
    pub async fn submit_password(
        &self,
        credentials: Credentials,
    ) -> Result<SessionState, SessionError> {
        let attempt = self.begin(SignInMethod::Password, "submit password")?;
        let span = tracing::info_span!("sign_in", attempt_id = %attempt.id, method = "password");

        let state = self
            .run_attempt(
                &attempt,
                self.provider
                    .sign_in_with_password(credentials.email(), credentials.password()),
            )
            .instrument(span)
            .await;

        Ok(state)
    }

    /// Signs in through the federated popup flow of `provider_id`.
    pub async fn submit_federated(
        &self,
        provider_id: ProviderId,
    ) -> Result<SessionState, SessionError> {
        let attempt = self.begin(
            SignInMethod::Federated(provider_id.clone()),
            "submit federated sign-in",
        )?;
        let span = tracing::info_span!(
            "sign_in",
            attempt_id = %attempt.id,
            method = "federated",
            provider_id = %provider_id,
        );

        let state = self
            .run_attempt(&attempt, self.provider.sign_in_with_popup(&provider_id))
            .instrument(span)
            .await;

        Ok(state)
    }

    /// Returns to `Idle` from any state, dropping any failure reason.
    ///
    /// An attempt still in flight is cancelled: its provider call is dropped
    /// and its `submit_*` future resolves with the state current at that time.
    pub fn reset(&self) {
        let mut previous = SessionPhase::Idle;
        self.state.send_if_modified(|state| {
            previous = state.phase();
            self.generation.fetch_add(1, Ordering::SeqCst);
            let changed = *state != SessionState::Idle;
            // Every phase may reset, so this cannot fail.
            let _ = state.advance(SessionState::Idle);
            changed
        });

        if previous == SessionPhase::Pending {
            tracing::info!("session reset while sign-in in flight, cancelling attempt");
        } else {
            tracing::debug!(from = %previous, "session reset");
        }
    }

    /// Moves to `Pending` if a submission is allowed from the current state.
    fn begin(&self, method: SignInMethod, action: &'static str) -> Result<Attempt, SessionError> {
        let mut rejected_from = None;
        let mut generation = 0;

        self.state.send_if_modified(|state| {
            let from = state.phase();
            match state.advance(SessionState::Pending) {
                Ok(()) => {
                    generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                    true
                }
                Err(_) => {
                    rejected_from = Some(from);
                    false
                }
            }
        });

        if let Some(from) = rejected_from {
            tracing::warn!(
                phase = %from,
                allowed = ?from.valid_transitions(),
                action,
                "rejected sign-in submission"
            );
            return Err(SessionError::invalid_transition(from, action));
        }

        Ok(Attempt {
            id: AttemptId::new(),
            generation,
            method,
        })
    }

    /// Runs the provider call unless the attempt is superseded first.
    ///
    /// On cancellation the call future is dropped before this returns, which
    /// releases the provider slot for the next attempt.
    async fn run_attempt<F>(&self, attempt: &Attempt, call: F) -> SessionState
    where
        F: Future<Output = Result<SessionHandle, ProviderError>>,
    {
        let result = tokio::select! {
            result = self.call_provider(call) => result,
            () = self.superseded(attempt.generation) => {
                tracing::info!("sign-in attempt cancelled");
                return self.state();
            }
        };
        self.settle(attempt, result)
    }

    /// Resolves once a reset or a newer submission has replaced `generation`.
    async fn superseded(&self, generation: u64) {
        let mut rx = self.state.subscribe();
        // A bump that leaves the state unchanged only happens when no attempt
        // is current, so a live attempt always sees its replacement. An error
        // means the sender is gone, which cannot happen while `self` is borrowed.
        let _ = rx
            .wait_for(|_| self.generation.load(Ordering::SeqCst) != generation)
            .await;
    }

    async fn call_provider<F>(&self, call: F) -> Result<SessionHandle, ProviderError>
    where
        F: Future<Output = Result<SessionHandle, ProviderError>>,
    {
        let _slot = self.provider_slot.lock().await;

        match self.options.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(timeout_ms = limit.as_millis() as u64, "provider call timed out");
                    Err(ProviderError::timeout())
                }
            },
            None => call.await,
        }
    }

    /// Applies the provider's answer unless the attempt was superseded.
    fn settle(
        &self,
        attempt: &Attempt,
        result: Result<SessionHandle, ProviderError>,
    ) -> SessionState {
        let outcome = match result {
            Ok(handle) => {
                tracing::info!(method = attempt.method.label(), "sign-in succeeded");
                AuthOutcome::Success(handle)
            }
            Err(err) => {
                let reason = FailureReason::classify(&attempt.method, &err.code);
                match &reason {
                    FailureReason::ProviderError(code) => tracing::warn!(
                        code = %code,
                        detail = err.message.as_deref().unwrap_or(""),
                        "sign-in failed with unmapped provider error"
                    ),
                    known => tracing::info!(reason = %known, "sign-in rejected"),
                }
                AuthOutcome::Failure(reason)
            }
        };

        let mut applied = false;
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != attempt.generation {
                return false;
            }
            applied = state.advance(SessionState::from(outcome)).is_ok();
            applied
        });

        if !applied {
            tracing::debug!("discarding outcome of superseded sign-in attempt");
        }

        self.state()
    }
}
