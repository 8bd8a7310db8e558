//! Recoverable signatures for the authorization protocol
//!
//! Two signature encodings are accepted: `Direct` signs the raw 32-byte
//! message digest, while `EthereumPrefixed` wraps the digest in the fixed
//! textual prefix hardware wallets apply before signing. Both recover to a
//! 20-byte address.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use serde::{Deserialize, Serialize};

use colony_common::Address;

use crate::error::{CryptoError, CryptoResult};
use crate::hash::{keccak256, Hash};

/// The fixed prefix applied by the hardware-wallet signing path
const ETHEREUM_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// How a signature binds to the message digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureKind {
    /// Signed over the raw 32-byte digest
    Direct,
    /// Signed over `keccak256(prefix ‖ digest)` with the fixed textual prefix
    EthereumPrefixed,
}

/// A 65-byte recoverable signature: two 32-byte scalars plus a recovery id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverableSignature {
    /// The `r` scalar
    pub r: [u8; 32],
    /// The `s` scalar
    pub s: [u8; 32],
    /// Recovery identifier (0 or 1)
    pub v: u8,
    /// The encoding the signer used
    pub kind: SignatureKind,
}

impl RecoverableSignature {
    /// Recover the signer address for `message`, a 32-byte digest.
    ///
    /// The digest actually signed depends on the encoding: `Direct` uses
    /// `message` as-is, `EthereumPrefixed` re-hashes it under the fixed
    /// prefix first.
    pub fn recover(&self, message: &Hash) -> CryptoResult<Address> {
        let digest = match self.kind {
            SignatureKind::Direct => *message,
            SignatureKind::EthereumPrefixed => prefixed_digest(message),
        };

        let mut raw = [0u8; 64];
        raw[..32].copy_from_slice(&self.r);
        raw[32..].copy_from_slice(&self.s);
        let signature = EcdsaSignature::from_slice(&raw)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        let recovery_id =
            RecoveryId::from_byte(self.v).ok_or(CryptoError::InvalidRecoveryId(self.v))?;

        let verifying_key =
            VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)
                .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

        Ok(address_of(&verifying_key))
    }
}

/// Digest for the hardware-wallet signing path
pub(crate) fn prefixed_digest(message: &Hash) -> Hash {
    let mut data = Vec::with_capacity(ETHEREUM_MESSAGE_PREFIX.len() + 32);
    data.extend_from_slice(ETHEREUM_MESSAGE_PREFIX);
    data.extend_from_slice(message.as_bytes());
    keccak256(&data)
}

/// Derive the address of a verifying key: the low 20 bytes of the Keccak-256
/// of the uncompressed public key body
pub(crate) fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // skip the 0x04 uncompressed-point tag
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash.as_bytes()[12..]);
    Address(out)
}
