use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::credential::Credential;
use crate::error::{AuthError, ConfigError};
use crate::mailer::Mailer;
use crate::password::{legacy_verify, PasswordHasher};
use crate::store::CredentialStore;
use crate::token::{SecureTokens, TokenSource};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Signup request.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    /// Administrative creation: the credential starts confirmed and no
    /// confirmation mail is sent.
    #[serde(default)]
    pub confirmed: bool,
}

/// Orchestrates the credential lifecycle: signup, login, confirmation,
/// password update, and forgot-password flows.
///
/// Stateless between calls apart from the credential it is handed; all side
/// effects of an operation happen in its body, in a fixed order
/// (validate, hash/generate, persist, notify).
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    mailer: Arc<dyn Mailer>,
    tokens: Arc<dyn TokenSource>,
    hasher: PasswordHasher,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        config: AuthConfig,
        store: Arc<dyn CredentialStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, ConfigError> {
        let hasher = PasswordHasher::new(config.hash_cost)?;
        Ok(Self {
            store,
            mailer,
            tokens: Arc::new(SecureTokens),
            hasher,
            config,
        })
    }

    /// Substitute the token source. Tests inject a deterministic source;
    /// production keeps [`SecureTokens`].
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    #[instrument(skip(self, request))]
    pub async fn sign_up(&self, request: SignUp) -> Result<Credential, AuthError> {
        let email = request.email.trim().to_string();
        self.validate_email(&email)?;
        self.validate_password(&request.password, &request.password_confirmation)?;

        let password_hash = if blank(&request.password) {
            String::new()
        } else {
            self.hasher.hash(&request.password)?
        };
        let credential = Credential {
            id: Uuid::new_v4(),
            email,
            password_hash,
            legacy: None,
            confirmation_token: (!request.confirmed).then(|| self.tokens.generate()),
            remember_token: self.tokens.generate(),
            email_confirmed: request.confirmed,
            created_at: OffsetDateTime::now_utc(),
        };
        self.store.save(&credential).await?;

        if !request.confirmed {
            if let Err(e) = self.mailer.send_confirmation(&credential).await {
                warn!(error = %e, email = %credential.email, "confirmation mail delivery failed");
            }
        }
        info!(credential_id = %credential.id, "credential created");
        Ok(credential)
    }

    /// Verify `password` for the credential registered under `email`.
    ///
    /// Unknown email and wrong password produce the identical
    /// [`AuthError::BadCredentials`]. A record still carrying a legacy-scheme
    /// digest is upgraded to the current scheme on its first successful
    /// login; the new hash is persisted before success is returned.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Credential, AuthError> {
        let Some(mut credential) = self.store.find_by_email(email).await? else {
            warn!(email = %email, "authentication for unknown email");
            return Err(AuthError::BadCredentials);
        };

        if let Some(legacy) = credential.legacy.take() {
            if !legacy_verify(password, &legacy.digest, &legacy.salt) {
                warn!(credential_id = %credential.id, "authentication failed");
                return Err(AuthError::BadCredentials);
            }
            credential.password_hash = self.hasher.hash(password)?;
            self.store.save(&credential).await?;
            info!(credential_id = %credential.id, "password hash upgraded from legacy scheme");
            return Ok(credential);
        }

        if credential.password_hash.is_empty()
            || !self.hasher.verify(password, &credential.password_hash)
        {
            warn!(credential_id = %credential.id, "authentication failed");
            return Err(AuthError::BadCredentials);
        }
        Ok(credential)
    }

    /// Consume the outstanding confirmation token and mark the email
    /// confirmed. Returns `false` without touching anything when no token is
    /// outstanding; confirming twice is a no-op, not an error.
    #[instrument(skip(self, credential), fields(credential_id = %credential.id))]
    pub async fn confirm_email(&self, credential: &mut Credential) -> Result<bool, AuthError> {
        if credential.confirmation_token.is_none() {
            return Ok(false);
        }
        credential.confirmation_token = None;
        credential.email_confirmed = true;
        self.store.save(credential).await?;
        info!(credential_id = %credential.id, "email confirmed");
        Ok(true)
    }

    /// Replace the stored password and consume any outstanding confirmation
    /// token, completing a pending reset. Returns `false` and mutates
    /// nothing when the new password is blank or the confirmation does not
    /// match; callers must branch on the boolean.
    #[instrument(skip_all, fields(credential_id = %credential.id))]
    pub async fn update_password(
        &self,
        credential: &mut Credential,
        new_password: &str,
        new_password_confirmation: &str,
    ) -> Result<bool, AuthError> {
        if blank(new_password) || new_password != new_password_confirmation {
            return Ok(false);
        }
        credential.password_hash = self.hasher.hash(new_password)?;
        credential.legacy = None;
        credential.confirmation_token = None;
        self.store.save(credential).await?;
        info!(credential_id = %credential.id, "password updated");
        Ok(true)
    }

    /// Reissue the confirmation token so the caller can build a reset link,
    /// and send the password-reset mail. Password and remember token are
    /// untouched. Racing with [`update_password`](Self::update_password),
    /// last write wins on the token.
    #[instrument(skip(self, credential), fields(credential_id = %credential.id))]
    pub async fn forgot_password(&self, credential: &mut Credential) -> Result<(), AuthError> {
        credential.confirmation_token = Some(self.tokens.generate());
        self.store.save(credential).await?;
        if let Err(e) = self.mailer.send_password_reset(credential).await {
            warn!(error = %e, email = %credential.email, "password reset mail delivery failed");
        }
        info!(credential_id = %credential.id, "password reset requested");
        Ok(())
    }

    /// Rotate the remember token. No preconditions.
    #[instrument(skip(self, credential), fields(credential_id = %credential.id))]
    pub async fn reset_remember_token(&self, credential: &mut Credential) -> Result<(), AuthError> {
        credential.remember_token = self.tokens.generate();
        self.store.save(credential).await?;
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<(), AuthError> {
        if email.is_empty() {
            if self.config.email_optional {
                return Ok(());
            }
            return Err(AuthError::validation("email", "can't be blank"));
        }
        if !is_valid_email(email) {
            return Err(AuthError::validation("email", "is invalid"));
        }
        Ok(())
    }

    fn validate_password(&self, password: &str, confirmation: &str) -> Result<(), AuthError> {
        if blank(password) {
            if self.config.password_optional && blank(confirmation) {
                return Ok(());
            }
            return Err(AuthError::validation("password", "can't be blank"));
        }
        if password != confirmation {
            return Err(AuthError::validation(
                "password_confirmation",
                "doesn't match password",
            ));
        }
        Ok(())
    }
}
