//! Error types for reputation proofs

use thiserror::Error;

/// Errors from reputation proof verification
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProofError {
    /// The key bytes do not follow the fixed 72-byte layout
    #[error("Malformed reputation key: {0}")]
    MalformedKey(String),

    /// The key's embedded colony or user does not match the verifier
    /// identity or the caller
    #[error("Reputation key mismatch: {0}")]
    KeyMismatch(String),

    /// The recomputed root does not match, or the siblings do not fit the
    /// branch mask
    #[error("Reputation proof does not match the root")]
    ProofMismatch,

    /// The key is not present in the tree (proof generation only)
    #[error("Key not found in reputation tree")]
    KeyNotFound,
}

/// Result type for reputation operations
pub type ProofResult<T> = Result<T, ProofError>;
