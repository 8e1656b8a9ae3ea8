//! Mock authentication adapters for testing.
//!
//! These adapters implement the `AuthProvider` and `FederatedCredentialSource`
//! ports in memory, avoiding the need for a real identity backend.
//!
//! # Example
//!
//! ```ignore
//! use auth_session::adapters::auth::MockAuthProvider;
//! use auth_session::domain::foundation::SessionHandle;
//!
//! let provider = MockAuthProvider::new()
//!     .with_account("a@b.com", "hunter2", SessionHandle::new("session-1")?)
//!     .with_federated_session("google", SessionHandle::new("session-g")?);
//!
//! let controller = AuthSessionController::new(Arc::new(provider));
//! ```
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. That is acceptable for
//! test code; these adapters are not meant for production.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Semaphore;

use crate::domain::auth::codes;
use crate::domain::foundation::{ProviderId, SessionHandle};
use crate::ports::{
    AuthProvider, FederatedCredentialSource, IdpCredential, IdpTokenKind, ProviderError,
};

#[derive(Debug, Clone)]
struct MockAccount {
    password: String,
    handle: SessionHandle,
}

/// In-memory identity backend.
///
/// Password sign-in mirrors a real backend: an email without `@` yields
/// `invalid-email`, an unknown email `user-not-found`, a wrong password
/// `wrong-password`. Federated sign-in returns whatever outcome was
/// registered for the provider id, or `operation-not-allowed`.
#[derive(Debug, Default)]
pub struct MockAuthProvider {
    /// Registered accounts keyed by email
    accounts: RwLock<HashMap<String, MockAccount>>,
    /// Scripted federated outcomes keyed by provider id
    federated: RwLock<HashMap<String, Result<SessionHandle, ProviderError>>>,
    /// Optional error to return for every call (for error testing)
    force_error: RwLock<Option<ProviderError>>,
    /// When set, calls wait for a permit before answering
    gate: Option<Semaphore>,
    calls: AtomicUsize,
    /// Calls currently running, and the highest value seen
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Counts a call as in flight until dropped, including when the caller
/// abandons the future.
struct InFlight<'a> {
    provider: &'a MockAuthProvider,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.provider.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockAuthProvider {
    /// Creates a new empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an email/password account.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        handle: SessionHandle,
    ) -> Self {
        self.add_account(email, password, handle);
        self
    }

    /// Makes federated sign-in with `provider_id` succeed.
    pub fn with_federated_session(self, provider_id: impl Into<String>, handle: SessionHandle) -> Self {
        self.federated
            .write()
            .expect("MockAuthProvider: federated lock poisoned")
            .insert(provider_id.into(), Ok(handle));
        self
    }

    /// Makes federated sign-in with `provider_id` fail with `error`.
    pub fn with_federated_error(self, provider_id: impl Into<String>, error: ProviderError) -> Self {
        self.federated
            .write()
            .expect("MockAuthProvider: federated lock poisoned")
            .insert(provider_id.into(), Err(error));
        self
    }

    /// Forces all calls to return the specified error.
    pub fn with_error(self, error: ProviderError) -> Self {
        *self
            .force_error
            .write()
            .expect("MockAuthProvider: error lock poisoned") = Some(error);
        self
    }

    /// Holds every call until [`MockAuthProvider::release`] hands out a permit.
    pub fn holding_requests(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Lets `count` held calls proceed.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Clears the forced error.
    pub fn clear_error(&self) {
        *self
            .force_error
            .write()
            .expect("MockAuthProvider: error lock poisoned") = None;
    }

    /// Adds an account at runtime.
    pub fn add_account(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        handle: SessionHandle,
    ) {
        self.accounts
            .write()
            .expect("MockAuthProvider: accounts lock poisoned")
            .insert(
                email.into(),
                MockAccount {
                    password: password.into(),
                    handle,
                },
            );
    }

    /// Returns how many sign-in calls have reached the provider.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns how many sign-in calls are running right now.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Returns the most sign-in calls that were ever running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn track(&self) -> InFlight<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight { provider: self }
    }

    async fn enter(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| ProviderError::internal(e.to_string()))?;
            permit.forget();
        }

        match self
            .force_error
            .read()
            .expect("MockAuthProvider: error lock poisoned")
            .clone()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionHandle, ProviderError> {
        let _in_flight = self.track();
        self.enter().await?;

        if !email.contains('@') {
            return Err(ProviderError::new(codes::INVALID_EMAIL));
        }

        let accounts = self
            .accounts
            .read()
            .expect("MockAuthProvider: accounts lock poisoned");
        let account = accounts
            .get(email)
            .ok_or_else(|| ProviderError::new(codes::USER_NOT_FOUND))?;

        if account.password != *password.expose_secret() {
            return Err(ProviderError::new(codes::WRONG_PASSWORD));
        }

        Ok(account.handle.clone())
    }

    async fn sign_in_with_popup(
        &self,
        provider_id: &ProviderId,
    ) -> Result<SessionHandle, ProviderError> {
        let _in_flight = self.track();
        self.enter().await?;

        self.federated
            .read()
            .expect("MockAuthProvider: federated lock poisoned")
            .get(provider_id.as_str())
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::new(codes::OPERATION_NOT_ALLOWED)))
    }
}

/// Federated credential source with preset answers per provider id.
///
/// Stands in for the browser popup in tests and headless deployments.
#[derive(Debug, Default)]
pub struct StaticCredentialSource {
    credentials: HashMap<String, IdpCredential>,
}

impl StaticCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests for `requested` with an id token for `canonical`.
    pub fn with_id_token(
        mut self,
        requested: impl Into<String>,
        canonical: ProviderId,
        token: impl Into<String>,
    ) -> Self {
        self.credentials.insert(
            requested.into(),
            IdpCredential::new(canonical, IdpTokenKind::IdToken, token),
        );
        self
    }

    /// Answers requests for `requested` with an OAuth access token.
    pub fn with_access_token(
        mut self,
        requested: impl Into<String>,
        canonical: ProviderId,
        token: impl Into<String>,
    ) -> Self {
        self.credentials.insert(
            requested.into(),
            IdpCredential::new(canonical, IdpTokenKind::AccessToken, token),
        );
        self
    }
}

#[async_trait]
impl FederatedCredentialSource for StaticCredentialSource {
    /// Unknown provider ids behave like a dismissed popup.
    async fn obtain_credential(
        &self,
        provider_id: &ProviderId,
    ) -> Result<IdpCredential, ProviderError> {
        self.credentials
            .get(provider_id.as_str())
            .cloned()
            .ok_or_else(ProviderError::popup_closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pw(value: &str) -> SecretString {
        SecretString::new(value.to_string())
    }

    fn handle() -> SessionHandle {
        SessionHandle::new("session-1").unwrap()
    }

    fn google() -> ProviderId {
        ProviderId::new("google").unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // MockAuthProvider Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn mock_provider_returns_handle_for_matching_password() {
        let provider = MockAuthProvider::new().with_account("a@b.com", "right", handle());

        let result = provider.sign_in_with_password("a@b.com", &pw("right")).await;

        assert_eq!(result, Ok(handle()));
    }

    #[tokio::test]
    async fn mock_provider_reports_wrong_password() {
        let provider = MockAuthProvider::new().with_account("a@b.com", "right", handle());

        let err = provider
            .sign_in_with_password("a@b.com", &pw("wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::WRONG_PASSWORD);
    }

    #[tokio::test]
    async fn mock_provider_reports_unknown_user() {
        let provider = MockAuthProvider::new();

        let err = provider
            .sign_in_with_password("x@y.com", &pw("x"))
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::USER_NOT_FOUND);
    }

    #[tokio::test]
    async fn mock_provider_reports_malformed_email() {
        let provider = MockAuthProvider::new();

        let err = provider
            .sign_in_with_password("bad", &pw("x"))
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::INVALID_EMAIL);
    }

    #[tokio::test]
    async fn mock_provider_forced_error_wins() {
        let provider = MockAuthProvider::new()
            .with_account("a@b.com", "right", handle())
            .with_error(ProviderError::network("down"));

        let err = provider
            .sign_in_with_password("a@b.com", &pw("right"))
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::NETWORK_REQUEST_FAILED);

        provider.clear_error();
        assert!(provider
            .sign_in_with_password("a@b.com", &pw("right"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn mock_provider_add_account_works_at_runtime() {
        let provider = MockAuthProvider::new();
        assert!(provider.sign_in_with_password("a@b.com", &pw("p")).await.is_err());

        provider.add_account("a@b.com", "p", handle());

        assert!(provider.sign_in_with_password("a@b.com", &pw("p")).await.is_ok());
    }

    #[tokio::test]
    async fn mock_provider_scripts_federated_outcomes() {
        let provider = MockAuthProvider::new()
            .with_federated_session("google", handle())
            .with_federated_error("github", ProviderError::popup_closed());

        assert_eq!(provider.sign_in_with_popup(&google()).await, Ok(handle()));

        let github = ProviderId::new("github").unwrap();
        assert_eq!(
            provider.sign_in_with_popup(&github).await,
            Err(ProviderError::popup_closed())
        );

        let other = ProviderId::new("twitter").unwrap();
        assert_eq!(
            provider.sign_in_with_popup(&other).await.unwrap_err().code,
            codes::OPERATION_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn mock_provider_tracks_abandoned_calls_as_finished() {
        let provider = Arc::new(
            MockAuthProvider::new()
                .with_federated_session("google", handle())
                .holding_requests(),
        );

        let held = tokio::spawn({
            let provider = provider.clone();
            async move { provider.sign_in_with_popup(&google()).await }
        });
        while provider.call_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(provider.in_flight(), 1);

        held.abort();
        let _ = held.await;

        assert_eq!(provider.in_flight(), 0);
        assert_eq!(provider.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn mock_provider_counts_calls() {
        let provider = MockAuthProvider::new().with_federated_session("google", handle());

        let _ = provider.sign_in_with_popup(&google()).await;
        let _ = provider.sign_in_with_password("bad", &pw("x")).await;

        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn mock_provider_holds_calls_until_released() {
        let provider = Arc::new(
            MockAuthProvider::new()
                .with_federated_session("google", handle())
                .holding_requests(),
        );

        let call = tokio::spawn({
            let provider = provider.clone();
            async move { provider.sign_in_with_popup(&google()).await }
        });

        tokio::task::yield_now().await;
        assert!(!call.is_finished());

        provider.release(1);
        assert_eq!(call.await.unwrap(), Ok(handle()));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // StaticCredentialSource Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn static_source_returns_registered_credential() {
        let source = StaticCredentialSource::new().with_id_token(
            "google",
            ProviderId::new("google.com").unwrap(),
            "idp-token",
        );

        let cred = source.obtain_credential(&google()).await.unwrap();

        assert_eq!(cred.provider_id.as_str(), "google.com");
        assert_eq!(cred.kind, IdpTokenKind::IdToken);
        assert_eq!(cred.token.expose_secret(), "idp-token");
    }

    #[tokio::test]
    async fn static_source_treats_unknown_provider_as_dismissed_popup() {
        let source = StaticCredentialSource::new();

        let err = source.obtain_credential(&google()).await.unwrap_err();

        assert_eq!(err.code, codes::POPUP_CLOSED_BY_USER);
    }
}
