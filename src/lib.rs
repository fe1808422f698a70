//! Email/password credential lifecycle: signup, email confirmation,
//! authentication with transparent legacy-hash migration, password reset,
//! and remember-me tokens.
//!
//! Persistence and mail delivery are collaborator traits
//! ([`CredentialStore`] and [`Mailer`]); the crate ships an in-memory store
//! and an SMTP mailer. [`AuthService`] holds the state machine.

pub mod config;
pub mod credential;
pub mod error;
pub mod mailer;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use config::AuthConfig;
pub use credential::{Credential, LegacyPassword};
pub use error::{AuthError, ConfigError, StoreError};
pub use mailer::{Mailer, SmtpMailer};
pub use password::PasswordHasher;
pub use service::{AuthService, SignUp};
pub use store::{CredentialStore, InMemoryStore};
pub use token::{SecureTokens, TokenSource};
