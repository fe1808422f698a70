use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::credential::Credential;
use crate::error::StoreError;

/// Persistence collaborator. Implementations must persist a credential's
/// fields atomically per record; no cross-record transactions are assumed.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError>;

    /// Upsert by id. Fails with [`StoreError::DuplicateEmail`] when a
    /// different record already holds the email.
    async fn save(&self, credential: &Credential) -> Result<(), StoreError>;
}

/// In-process store, suitable for tests and embedded hosts.
///
/// Emails are stored case-preserving; comparison strictness is chosen at
/// construction. Blank emails (optional-email credentials) are exempt from
/// the uniqueness check.
pub struct InMemoryStore {
    records: Mutex<HashMap<Uuid, Credential>>,
    case_insensitive: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            case_insensitive: false,
        }
    }

    /// Compare emails ignoring ASCII case on lookup and uniqueness checks.
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Self::new()
        }
    }

    fn email_eq(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .find(|c| self.email_eq(&c.email, email))
            .cloned())
    }

    async fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        if !credential.email.trim().is_empty()
            && records
                .values()
                .any(|c| c.id != credential.id && self.email_eq(&c.email, &credential.email))
        {
            return Err(StoreError::DuplicateEmail);
        }
        records.insert(credential.id, credential.clone());
        Ok(())
    }
}
