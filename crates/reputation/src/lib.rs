//! Reputation proof verification for the Colony governance engine
//!
//! A member proves a `(colony, skill, user) → value` reputation entry
//! against a published root hash using a compact branch-mask Merkle proof.
//! The root itself comes from an external oracle of global reputation
//! state; this crate only verifies inclusion and that the claimant is
//! proving their own standing. The proof-producing side of the same tree
//! lives here too, for the off-chain client that maintains the state.

pub mod error;
pub mod key;
pub mod oracle;
pub mod proof;
pub mod tree;

pub use error::{ProofError, ProofResult};
pub use key::ReputationKey;
pub use oracle::{ReputationRootOracle, StaticRootOracle};
pub use proof::{verify_proof, BranchMask, ReputationProofVerifier};
pub use tree::ReputationTree;
