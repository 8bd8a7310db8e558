//! Branch-mask Merkle proof verification
//!
//! The tree is a sparse, path-compressed binary Merkle tree over 256-bit
//! paths (`keccak256` of the key). A proof carries a 256-bit branch mask —
//! one set bit per level at which the sibling subtree is non-empty — and
//! the sibling hashes for exactly those levels, ordered leaf-upward. The
//! verifier folds the leaf hash upward: at each set bit it consumes the
//! next sibling and orders the concatenation by the path bit at that
//! level.

use serde::{Deserialize, Serialize};
use tracing::debug;

use colony_common::Address;

use crate::error::{ProofError, ProofResult};
use crate::key::ReputationKey;

use colony_crypto::{keccak256, Hash};

/// A 256-bit mask with one set bit per non-empty sibling level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BranchMask(pub [u8; 32]);

impl BranchMask {
    /// Whether bit `i` is set; bit 0 is the least significant bit of the
    /// last byte
    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < 256);
        (self.0[31 - i / 8] >> (i % 8)) & 1 == 1
    }

    /// Set bit `i`
    pub fn set_bit(&mut self, i: usize) {
        debug_assert!(i < 256);
        self.0[31 - i / 8] |= 1 << (i % 8);
    }

    /// The number of siblings a proof under this mask carries
    pub fn count_ones(&self) -> usize {
        self.0.iter().map(|b| b.count_ones() as usize).sum()
    }
}

/// Bit `i` of a 256-bit path, same numbering as [`BranchMask::bit`]
pub(crate) fn path_bit(path: &Hash, i: usize) -> bool {
    (path.as_bytes()[31 - i / 8] >> (i % 8)) & 1 == 1
}

/// The hash of a leaf entry
pub(crate) fn leaf_hash(key: &[u8], value: &[u8]) -> Hash {
    let mut data = Vec::with_capacity(key.len() + value.len());
    data.extend_from_slice(key);
    data.extend_from_slice(value);
    keccak256(&data)
}

/// Combine two child hashes into their parent
pub(crate) fn node_hash(left: &Hash, right: &Hash) -> Hash {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(left.as_bytes());
    data[32..].copy_from_slice(right.as_bytes());
    keccak256(&data)
}

/// Recompute the root implied by `(key, value, branch_mask, siblings)` and
/// compare it to `root`. Purely structural: the identity checks live in
/// [`ReputationProofVerifier::verify`].
pub fn verify_proof(
    key: &[u8],
    value: &[u8],
    branch_mask: &BranchMask,
    siblings: &[Hash],
    root: &Hash,
) -> ProofResult<()> {
    if siblings.len() != branch_mask.count_ones() {
        return Err(ProofError::ProofMismatch);
    }

    let path = keccak256(key);
    let mut node = leaf_hash(key, value);
    let mut next_sibling = siblings.iter();
    for i in 0..256 {
        if branch_mask.bit(i) {
            let sibling = next_sibling.next().ok_or(ProofError::ProofMismatch)?;
            node = if path_bit(&path, i) {
                node_hash(sibling, &node)
            } else {
                node_hash(&node, sibling)
            };
        }
    }

    if node != *root {
        return Err(ProofError::ProofMismatch);
    }
    Ok(())
}

/// Verifies reputation claims on behalf of one colony
#[derive(Debug, Clone)]
pub struct ReputationProofVerifier {
    /// The verifying colony's own identity
    identity: Address,
}

impl ReputationProofVerifier {
    /// Create a verifier bound to the colony's identity
    pub fn new(identity: Address) -> Self {
        Self { identity }
    }

    /// Verify a reputation claim.
    ///
    /// The key must embed this colony's identity and the caller's own
    /// address — proofs are never transferable to another claimant or
    /// organization. The structural check then runs against `root`.
    pub fn verify(
        &self,
        key_bytes: &[u8],
        value: &[u8],
        branch_mask: &BranchMask,
        siblings: &[Hash],
        root: &Hash,
        caller: Address,
    ) -> ProofResult<ReputationKey> {
        let key = ReputationKey::from_bytes(key_bytes)?;
        if key.colony != self.identity {
            return Err(ProofError::KeyMismatch(format!(
                "key is for colony {}, verifier is {}",
                key.colony, self.identity
            )));
        }
        if key.user != caller {
            return Err(ProofError::KeyMismatch(format!(
                "key is for user {}, caller is {}",
                key.user, caller
            )));
        }
        verify_proof(key_bytes, value, branch_mask, siblings, root)?;
        debug!(user = %caller, skill = %key.skill_id, "reputation proof verified");
        Ok(key)
    }
}
