use rand::{rngs::OsRng, RngCore};

/// Raw entropy per token. Hex-encoding doubles this into the string length.
pub const TOKEN_BYTES: usize = 20;

/// Source of confirmation and remember tokens.
///
/// A trait so tests can substitute a deterministic source; production code
/// uses [`SecureTokens`].
pub trait TokenSource: Send + Sync {
    /// A fixed-length, URL-safe random token.
    fn generate(&self) -> String;
}

/// Production token source backed by the operating system CSPRNG.
///
/// Entropy comes from [`OsRng`], never from wall-clock time, counters, or
/// record identity: tokens generated in the same process tick for identical
/// inputs are still distinct with overwhelming probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureTokens;

impl TokenSource for SecureTokens {
    fn generate(&self) -> String {
        let mut buf = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut buf);
        hex::encode(buf)
    }
}
