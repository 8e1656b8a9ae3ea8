//! Email/password credentials collected by a sign-in form.

use secrecy::SecretString;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Credentials for a single password sign-in attempt.
///
/// Both fields must be non-empty. Whether the email is a well-formed address
/// is decided by the identity provider, which reports `invalid-email`; use
/// [`Credentials::looks_like_email`] for an early client-side hint.
///
/// Neither field appears in `Debug` output: the password is a
/// [`SecretString`] and the email is replaced by a placeholder.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    /// Creates credentials, rejecting empty fields.
    ///
    /// Both values are kept exactly as entered and passed to the provider
    /// unchanged. A whitespace-only email counts as empty.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ValidationError::empty_field("email"));
        }

        let password = password.into();
        if password.is_empty() {
            return Err(ValidationError::empty_field("password"));
        }

        Ok(Self {
            email,
            password: SecretString::new(password),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Cheap syntactic check: one `@` with a non-empty local part and a
    /// dotted domain.
    pub fn looks_like_email(&self) -> bool {
        let Some((local, domain)) = self.email.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                .unwrap_or(false)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &"[REDACTED]")
            .field("password", &self.password)
            .finish()
    }
}
