//! Well-known provider error codes.
//!
//! Codes are lower-kebab-case and may arrive prefixed with the `auth/`
//! namespace used by browser SDKs.

pub const WRONG_PASSWORD: &str = "wrong-password";
pub const USER_NOT_FOUND: &str = "user-not-found";
pub const INVALID_EMAIL: &str = "invalid-email";
pub const POPUP_CLOSED_BY_USER: &str = "popup-closed-by-user";

pub const INVALID_CREDENTIAL: &str = "invalid-credential";
pub const USER_DISABLED: &str = "user-disabled";
pub const TOO_MANY_REQUESTS: &str = "too-many-requests";
pub const OPERATION_NOT_ALLOWED: &str = "operation-not-allowed";
pub const NETWORK_REQUEST_FAILED: &str = "network-request-failed";
pub const INTERNAL_ERROR: &str = "internal-error";
pub const TIMEOUT: &str = "timeout";

/// Namespace prefix stripped before table lookups.
pub const NAMESPACE_PREFIX: &str = "auth/";

/// Returns the code without its `auth/` namespace, if present.
pub fn strip_namespace(code: &str) -> &str {
    code.strip_prefix(NAMESPACE_PREFIX).unwrap_or(code)
}
