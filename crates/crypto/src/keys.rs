//! Signing keypairs
//!
//! Keypairs live with the callers of the engine (and its tests); the engine
//! itself only ever recovers addresses from signatures.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;

use colony_common::Address;

use crate::error::{CryptoError, CryptoResult};
use crate::hash::Hash;
use crate::signature::{address_of, prefixed_digest, RecoverableSignature, SignatureKind};

/// A secp256k1 keypair able to produce both signature encodings
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh random keypair
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte secret scalar
    pub fn from_secret(secret: &[u8; 32]) -> CryptoResult<Self> {
        let signing_key =
            SigningKey::from_slice(secret).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// The address this keypair's signatures recover to
    pub fn address(&self) -> Address {
        address_of(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte message digest under the given encoding
    pub fn sign(&self, message: &Hash, kind: SignatureKind) -> CryptoResult<RecoverableSignature> {
        let digest = match kind {
            SignatureKind::Direct => *message,
            SignatureKind::EthereumPrefixed => prefixed_digest(message),
        };

        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(RecoverableSignature {
            r,
            s,
            v: recovery_id.to_byte(),
            kind,
        })
    }
}
