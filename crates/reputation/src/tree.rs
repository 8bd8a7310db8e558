//! The proof-producing side of the reputation tree
//!
//! A sparse, path-compressed binary Merkle tree over 256-bit key paths.
//! The off-chain reputation client maintains one of these and publishes
//! its root; members extract `(branch_mask, siblings)` proofs from it that
//! verify under [`crate::proof::verify_proof`]'s folding rule.

use std::collections::BTreeMap;

use colony_crypto::{keccak256, Hash};

use crate::error::{ProofError, ProofResult};
use crate::proof::{leaf_hash, node_hash, path_bit, BranchMask};

/// An in-memory reputation state tree
#[derive(Debug, Clone, Default)]
pub struct ReputationTree {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl ReputationTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The current root hash; the zero hash for an empty tree
    pub fn root(&self) -> Hash {
        let leaves = self.leaves();
        if leaves.is_empty() {
            return Hash::zero();
        }
        Self::subtree_hash(&leaves, 255)
    }

    /// Produce the `(branch_mask, siblings)` proof for `key`, siblings
    /// ordered leaf-upward as the verifier consumes them
    pub fn proof(&self, key: &[u8]) -> ProofResult<(BranchMask, Vec<Hash>)> {
        if !self.entries.contains_key(key) {
            return Err(ProofError::KeyNotFound);
        }
        let leaves = self.leaves();
        let target = keccak256(key);

        let mut mask = BranchMask::default();
        // collected root-downward, so deepest last
        let mut collected: Vec<(usize, Hash)> = Vec::new();
        let mut current: Vec<(Hash, Hash)> = leaves;
        let mut bit = 255i32;
        while current.len() > 1 {
            let (zeros, ones): (Vec<_>, Vec<_>) = current
                .iter()
                .cloned()
                .partition(|(path, _)| !path_bit(path, bit as usize));
            if !zeros.is_empty() && !ones.is_empty() {
                let (own, sibling) = if path_bit(&target, bit as usize) {
                    (ones, Self::subtree_hash(&zeros, bit - 1))
                } else {
                    (zeros, Self::subtree_hash(&ones, bit - 1))
                };
                mask.set_bit(bit as usize);
                collected.push((bit as usize, sibling));
                current = own;
            }
            bit -= 1;
        }

        collected.reverse();
        Ok((mask, collected.into_iter().map(|(_, h)| h).collect()))
    }

    fn leaves(&self) -> Vec<(Hash, Hash)> {
        self.entries
            .iter()
            .map(|(k, v)| (keccak256(k), leaf_hash(k, v)))
            .collect()
    }

    /// Hash of the subtree holding `entries`, splitting at `bit` and
    /// below. A singleton subtree hashes as its leaf regardless of depth
    /// (path compression); levels where one side is empty contribute
    /// nothing.
    fn subtree_hash(entries: &[(Hash, Hash)], bit: i32) -> Hash {
        if entries.len() == 1 {
            return entries[0].1;
        }
        debug_assert!(bit >= 0, "distinct key paths must diverge");
        let (zeros, ones): (Vec<_>, Vec<_>) = entries
            .iter()
            .cloned()
            .partition(|(path, _)| !path_bit(path, bit as usize));
        if zeros.is_empty() {
            Self::subtree_hash(&ones, bit - 1)
        } else if ones.is_empty() {
            Self::subtree_hash(&zeros, bit - 1)
        } else {
            node_hash(
                &Self::subtree_hash(&zeros, bit - 1),
                &Self::subtree_hash(&ones, bit - 1),
            )
        }
    }
}
