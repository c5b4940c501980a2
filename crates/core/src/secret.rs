//! Refresh-secret generation, hashing and verification.
//!
//! A refresh secret is 32 bytes from the operating system's CSPRNG. Only its
//! Argon2id hash (PHC string, random 16-byte salt) is persisted, so a leaked
//! session table cannot be replayed or cheaply brute-forced. The raw bytes go
//! back to the client exactly once, base64 (standard alphabet) encoded.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::config::HashCost;
use crate::error::CoreError;

/// Length of a raw refresh secret in bytes.
pub const SECRET_LEN: usize = 32;

/// Length of the Argon2 salt in bytes.
const SALT_LEN: usize = 16;

/// A freshly generated refresh secret and its hash.
pub struct GeneratedSecret {
    /// Raw secret bytes. Hand to the client once; never persist.
    pub raw: [u8; SECRET_LEN],
    /// Argon2id PHC string suitable for storage.
    pub hash: String,
}

impl GeneratedSecret {
    /// The transport encoding of the raw secret.
    pub fn encoded(&self) -> String {
        encode_secret(&self.raw)
    }
}

/// Produces and verifies refresh secrets with a fixed Argon2id cost.
#[derive(Clone)]
pub struct RefreshSecretGenerator {
    params: Params,
}

impl RefreshSecretGenerator {
    /// Build a generator for the given cost.
    pub fn new(cost: HashCost) -> Result<Self, CoreError> {
        Ok(Self {
            params: cost.params()?,
        })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Generate a new secret and hash it.
    ///
    /// Fails with [`CoreError::Entropy`] if the OS random source is
    /// unavailable.
    pub fn generate(&self) -> Result<GeneratedSecret, CoreError> {
        let mut raw = [0u8; SECRET_LEN];
        fill_random(&mut raw)?;
        let hash = self.hash(&raw)?;
        Ok(GeneratedSecret { raw, hash })
    }

    /// Hash `raw` with a fresh random salt.
    pub fn hash(&self, raw: &[u8]) -> Result<String, CoreError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        fill_random(&mut salt_bytes)?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| CoreError::Internal(format!("Salt encoding error: {e}")))?;

        let hash = self
            .hasher()
            .hash_password(raw, &salt)
            .map_err(|e| CoreError::Internal(format!("Refresh secret hashing error: {e}")))?;
        Ok(hash.to_string())
    }

    /// Check `raw` against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch. The cost parameters embedded in the
    /// stored hash are used, so hashes written under an older cost still
    /// verify. A hash that cannot be parsed is an internal error.
    pub fn verify(&self, raw: &[u8], stored_hash: &str) -> Result<bool, CoreError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| CoreError::Internal(format!("Stored hash is unreadable: {e}")))?;
        match self.hasher().verify_password(raw, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CoreError::Internal(format!(
                "Refresh secret verification error: {e}"
            ))),
        }
    }
}

fn fill_random(buf: &mut [u8]) -> Result<(), CoreError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CoreError::Entropy(e.to_string()))
}

/// Encode raw secret bytes for transport.
pub fn encode_secret(raw: &[u8]) -> String {
    STANDARD.encode(raw)
}

/// Decode a transported secret back to raw bytes.
pub fn decode_secret(encoded: &str) -> Result<Vec<u8>, CoreError> {
    if encoded.is_empty() {
        return Err(CoreError::Validation("Refresh token is empty".into()));
    }
    STANDARD
        .decode(encoded)
        .map_err(|_| CoreError::Validation("Refresh token is not valid base64".into()))
}
