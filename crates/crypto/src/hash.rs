//! Keccak-256 hashing for the colony engine

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::error::{CryptoError, CryptoResult};

/// A 32-byte Keccak-256 hash value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The all-zero hash
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash value as lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hash from a 64-character hex string
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let bytes =
            hex::decode(s).map_err(|e| CryptoError::InvalidKey(format!("bad hash hex: {}", e)))?;
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKey(format!(
                "bad hash length: expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Keccak-256 of arbitrary data
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let out = hasher.finalize();
    let mut value = [0u8; 32];
    value.copy_from_slice(&out);
    Hash(value)
}

/// Build the commit-reveal secret for a rating.
///
/// The byte order is fixed as `salt ‖ score`: a 32-byte caller-chosen salt
/// followed by the single score byte. Both the committer and the engine must
/// use this exact concatenation.
pub fn rating_secret(salt: &[u8; 32], score: u8) -> Hash {
    let mut data = [0u8; 33];
    data[..32].copy_from_slice(salt);
    data[32] = score;
    keccak256(&data)
}
