//! Error types for the authentication core.
//!
//! All error types use `thiserror`. Collaborator implementations wrap their
//! backend failures in `anyhow::Error`; the service surfaces them as
//! [`AuthError::Internal`].

use thiserror::Error;

/// Fatal configuration problems, raised when the service is constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Hash cost outside the supported range.
    #[error("hash cost {0} outside supported range {1}..={2}")]
    HashCost(u32, u32, u32),

    /// The hashing backend rejected the derived parameters.
    #[error("invalid hash parameters: {0}")]
    HashParams(String),
}

/// Errors reported by a [`CredentialStore`](crate::store::CredentialStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another credential already holds this email.
    #[error("email is already taken")]
    DuplicateEmail,

    /// Backend failure (connection, I/O, ...).
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Errors surfaced by service operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input; recoverable, suitable for user display.
    #[error("{field} {reason}")]
    Validation { field: String, reason: String },

    /// Email uniqueness violation at the persistence boundary.
    #[error("email is already taken")]
    DuplicateEmail,

    /// Wrong password or unknown email. Deliberately a single variant so the
    /// outcome does not leak which email addresses exist.
    #[error("bad email or password")]
    BadCredentials,

    /// Unexpected failure in a collaborator or the hashing backend.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub(crate) fn validation(field: &str, reason: &str) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            StoreError::Backend(e) => AuthError::Internal(e),
        }
    }
}
