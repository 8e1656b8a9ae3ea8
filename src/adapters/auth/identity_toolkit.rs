//! Identity Toolkit REST adapter.
//!
//! Implements the `AuthProvider` port against an identity backend speaking
//! the Identity Toolkit v1 REST dialect (the wire format behind hosted
//! email/password and federated sign-in):
//!
//! 1. Password sign-in posts to `accounts:signInWithPassword`
//! 2. Federated sign-in asks a `FederatedCredentialSource` for the popup
//!    credential, then exchanges it at `accounts:signInWithIdp`
//! 3. The returned `idToken` becomes the `SessionHandle`
//! 4. Server error messages (`EMAIL_NOT_FOUND`, ...) are translated to
//!    client codes (`user-not-found`, ...)
//!
//! # Example
//!
//! ```ignore
//! let config = IdentityToolkitConfig::new(api_key)
//!     .with_timeout(Duration::from_secs(5));
//! let provider = IdentityToolkitProvider::new(config, Arc::new(popup))?;
//! let controller = AuthSessionController::new(Arc::new(provider));
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::auth::codes;
use crate::domain::foundation::{ProviderId, SessionHandle};
use crate::ports::{AuthProvider, FederatedCredentialSource, IdpCredential, ProviderError};

/// Public Identity Toolkit endpoint.
pub const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Redirect URI reported to the backend for popup credentials.
pub const DEFAULT_REQUEST_URI: &str = "http://localhost";

/// Configuration for the Identity Toolkit adapter.
#[derive(Debug, Clone)]
pub struct IdentityToolkitConfig {
    /// Web API key of the project.
    api_key: SecretString,
    /// Base URL, without the `accounts:` suffix.
    pub base_url: String,
    pub request_uri: String,
    pub timeout: Duration,
}

impl IdentityToolkitConfig {
    /// Creates a configuration for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_uri: DEFAULT_REQUEST_URI.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Points the adapter at another backend (emulator, proxy, test server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_request_uri(mut self, uri: impl Into<String>) -> Self {
        self.request_uri = uri.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    fn endpoint_url(&self, method: &str) -> String {
        format!("{}/accounts:{}", self.base_url.trim_end_matches('/'), method)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordSignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpSignInRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

/// Fields shared by the password and IdP sign-in responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    #[serde(default)]
    local_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Identity Toolkit backed `AuthProvider`.
pub struct IdentityToolkitProvider {
    config: IdentityToolkitConfig,
    client: Client,
    popup: Arc<dyn FederatedCredentialSource>,
}

impl IdentityToolkitProvider {
    /// Creates the adapter. Fails only if the HTTP client cannot be built.
    pub fn new(
        config: IdentityToolkitConfig,
        popup: Arc<dyn FederatedCredentialSource>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            popup,
        })
    }

    async fn sign_in<B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<SessionHandle, ProviderError> {
        tracing::debug!(endpoint = method, "calling identity backend");

        let response = self
            .client
            .post(self.config.endpoint_url(method))
            .query(&[("key", self.config.api_key())])
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_from_body(status, &body);
            tracing::debug!(status = status.as_u16(), code = %err.code, "identity backend refused sign-in");
            return Err(err);
        }

        let payload: SignInResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse sign-in response: {}", e);
            ProviderError::internal(format!("Failed to parse sign-in response: {}", e))
        })?;

        tracing::debug!(
            has_local_id = payload.local_id.is_some(),
            "identity backend issued session"
        );

        SessionHandle::new(payload.id_token)
            .map_err(|_| ProviderError::internal("identity backend returned an empty idToken"))
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionHandle, ProviderError> {
        let request = PasswordSignInRequest {
            email,
            password: password.expose_secret(),
            return_secure_token: true,
        };
        self.sign_in("signInWithPassword", &request).await
    }

    async fn sign_in_with_popup(
        &self,
        provider_id: &ProviderId,
    ) -> Result<SessionHandle, ProviderError> {
        let credential = self.popup.obtain_credential(provider_id).await?;

        let request = IdpSignInRequest {
            post_body: idp_post_body(&credential),
            request_uri: &self.config.request_uri,
            return_secure_token: true,
            return_idp_credential: true,
        };
        self.sign_in("signInWithIdp", &request).await
    }
}

impl std::fmt::Debug for IdentityToolkitProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityToolkitProvider")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

/// Form-encoded `postBody` carrying the popup credential.
fn idp_post_body(credential: &IdpCredential) -> String {
    format!(
        "{}={}&providerId={}",
        credential.kind.param_name(),
        urlencoding::encode(credential.token.expose_secret()),
        urlencoding::encode(credential.provider_id.as_str()),
    )
}

fn transport_error(e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        tracing::warn!("Identity backend request timed out: {}", e);
        ProviderError::timeout().with_message(e.to_string())
    } else {
        tracing::warn!("Identity backend unreachable: {}", e);
        ProviderError::network(e.to_string())
    }
}

/// Builds a `ProviderError` from a non-2xx response body.
fn error_from_body(status: StatusCode, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            ProviderError::new(client_code(&envelope.error.message))
                .with_message(envelope.error.message)
        }
        _ => ProviderError::internal(format!("identity backend returned HTTP {}", status)),
    }
}

/// Translates a server error message into a client error code.
///
/// Messages may carry detail after ` : ` (e.g. `TOO_MANY_ATTEMPTS_TRY_LATER : ...`);
/// only the leading token is used. Unknown tokens are lower-kebab-cased.
fn client_code(server_message: &str) -> String {
    let token = server_message
        .split(" : ")
        .next()
        .unwrap_or(server_message)
        .trim();

    let code = match token {
        "EMAIL_NOT_FOUND" => codes::USER_NOT_FOUND,
        "INVALID_PASSWORD" => codes::WRONG_PASSWORD,
        "INVALID_EMAIL" => codes::INVALID_EMAIL,
        "USER_DISABLED" => codes::USER_DISABLED,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => codes::TOO_MANY_REQUESTS,
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => codes::INVALID_CREDENTIAL,
        "OPERATION_NOT_ALLOWED" => codes::OPERATION_NOT_ALLOWED,
        "" => codes::INTERNAL_ERROR,
        other => return other.to_ascii_lowercase().replace('_', "-"),
    };
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::IdpTokenKind;

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_builds_endpoint_urls() {
        let config = IdentityToolkitConfig::new("key");
        assert_eq!(
            config.endpoint_url("signInWithPassword"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword"
        );
    }

    #[test]
    fn config_handles_trailing_slash() {
        let config = IdentityToolkitConfig::new("key").with_base_url("http://127.0.0.1:9099/v1/");
        assert_eq!(
            config.endpoint_url("signInWithIdp"),
            "http://127.0.0.1:9099/v1/accounts:signInWithIdp"
        );
    }

    #[test]
    fn config_debug_redacts_api_key() {
        let config = IdentityToolkitConfig::new("AIza-very-secret");
        assert!(!format!("{:?}", config).contains("AIza-very-secret"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Translation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn client_code_maps_known_server_messages() {
        assert_eq!(client_code("EMAIL_NOT_FOUND"), "user-not-found");
        assert_eq!(client_code("INVALID_PASSWORD"), "wrong-password");
        assert_eq!(client_code("INVALID_EMAIL"), "invalid-email");
        assert_eq!(client_code("USER_DISABLED"), "user-disabled");
        assert_eq!(client_code("INVALID_LOGIN_CREDENTIALS"), "invalid-credential");
    }

    #[test]
    fn client_code_ignores_detail_suffix() {
        assert_eq!(
            client_code("TOO_MANY_ATTEMPTS_TRY_LATER : Access has been temporarily disabled"),
            "too-many-requests"
        );
    }

    #[test]
    fn client_code_kebab_cases_unknown_messages() {
        assert_eq!(client_code("QUOTA_EXCEEDED"), "quota-exceeded");
    }

    #[test]
    fn error_from_body_reads_envelope() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_NOT_FOUND","errors":[]}}"#;
        let err = error_from_body(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.code, "user-not-found");
        assert_eq!(err.message.as_deref(), Some("EMAIL_NOT_FOUND"));
    }

    #[test]
    fn error_from_body_falls_back_to_internal_error() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.code, "internal-error");
        assert!(err.message.unwrap().contains("502"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Wire Format Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn idp_post_body_encodes_token_and_provider() {
        let credential = IdpCredential::new(
            ProviderId::new("google.com").unwrap(),
            IdpTokenKind::IdToken,
            "a+b/c=",
        );
        assert_eq!(
            idp_post_body(&credential),
            "id_token=a%2Bb%2Fc%3D&providerId=google.com"
        );
    }

    #[test]
    fn password_request_serializes_camel_case() {
        let request = PasswordSignInRequest {
            email: "a@b.com",
            password: "pw",
            return_secure_token: true,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "email": "a@b.com",
                "password": "pw",
                "returnSecureToken": true
            })
        );
    }

    #[test]
    fn sign_in_response_tolerates_extra_fields() {
        let body = r#"{"kind":"identitytoolkit#VerifyPasswordResponse","localId":"u1","idToken":"tok","refreshToken":"r","expiresIn":"3600"}"#;
        let parsed: SignInResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.id_token, "tok");
        assert_eq!(parsed.local_id.as_deref(), Some("u1"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Type Safety Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IdentityToolkitProvider>();
    }
}
