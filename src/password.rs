use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::error;

use crate::error::ConfigError;

/// Default work factor: 1 << 14 KiB = 16 MiB of memory per hash.
pub const DEFAULT_COST: u32 = 14;
/// Smallest cost Argon2 accepts (8 KiB). Test environments only.
pub const MIN_COST: u32 = 3;
/// Largest supported cost (4 GiB).
pub const MAX_COST: u32 = 22;

/// Salted adaptive one-way hashing with a single integer work factor.
///
/// The cost maps to Argon2id memory cost (`1 << cost` KiB) with library
/// defaults for time and parallelism. Each hash embeds its own random salt
/// and parameters, so verification works regardless of the cost this hasher
/// was built with.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, ConfigError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(ConfigError::HashCost(cost, MIN_COST, MAX_COST));
        }
        let params = Params::new(1 << cost, Params::DEFAULT_T_COST, Params::DEFAULT_P_COST, None)
            .map_err(|e| ConfigError::HashParams(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// True iff `plain` re-hashes to an equivalent value under the salt and
    /// parameters embedded in `hash`. A malformed stored hash reads as a
    /// verification failure, never an error into the caller's flow.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(error = %e, "malformed stored password hash");
                return false;
            }
        };
        self.argon2.verify_password(plain.as_bytes(), &parsed).is_ok()
    }
}

/// Digest of the retired scheme: lowercase hex SHA-256 over
/// `salt + password + salt`. Only computed to verify unmigrated records;
/// new credentials never store this format.
pub fn legacy_digest(plain: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn legacy_verify(plain: &str, digest: &str, salt: &str) -> bool {
    legacy_digest(plain, salt) == digest
}
