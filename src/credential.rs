use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Digest and salt from the retired hashing scheme, kept only until the
/// record's first successful login under the new scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyPassword {
    pub digest: String,
    pub salt: String,
}

/// One credential per user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: Uuid,                              // unique credential ID
    pub email: String,                         // case-preserving
    #[serde(skip_serializing)]
    pub password_hash: String,                 // PHC string; empty when password is optional and unset
    #[serde(skip_serializing, default)]
    pub legacy: Option<LegacyPassword>,        // present only for unmigrated records
    #[serde(skip_serializing, default)]
    pub confirmation_token: Option<String>,    // set until confirmed, reissued for password resets
    #[serde(skip_serializing)]
    pub remember_token: String,                // rotated on demand
    pub email_confirmed: bool,
    pub created_at: OffsetDateTime,
}

impl Credential {
    /// A password reset is pending when the email is already confirmed but a
    /// confirmation token is outstanding.
    pub fn reset_pending(&self) -> bool {
        self.email_confirmed && self.confirmation_token.is_some()
    }
}
