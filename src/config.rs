use serde::Deserialize;

use crate::password::DEFAULT_COST;

/// Runtime options recognized by the authentication core.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Argon2 work factor; memory cost is `1 << hash_cost` KiB. Lower only
    /// in test environments.
    pub hash_cost: u32,
    /// Sender address handed opaquely to the mailer.
    pub mailer_sender: String,
    /// Allow credentials without an email (guest identities).
    pub email_optional: bool,
    /// Allow credentials without a password (third-party identities).
    pub password_optional: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash_cost: DEFAULT_COST,
            mailer_sender: "no-reply@localhost".into(),
            email_optional: false,
            password_optional: false,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hash_cost: std::env::var("AUTH_HASH_COST")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.hash_cost),
            mailer_sender: std::env::var("AUTH_MAILER_SENDER")
                .unwrap_or(defaults.mailer_sender),
            email_optional: std::env::var("AUTH_EMAIL_OPTIONAL")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.email_optional),
            password_optional: std::env::var("AUTH_PASSWORD_OPTIONAL")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.password_optional),
        }
    }
}
