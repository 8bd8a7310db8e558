//! Error types for authorization

use thiserror::Error;

use colony_crypto::CryptoError;
use colony_tasks::Role;

/// Errors raised when a call fails its co-signature check
#[derive(Error, Debug)]
pub enum AuthorizationError {
    /// The number of signatures does not match the registry entry
    #[error("Bad signature count: expected {expected}, got {actual}")]
    BadSignatureCount {
        /// Signatures the registry entry requires
        expected: usize,
        /// Signatures the caller supplied
        actual: usize,
    },

    /// A signature could not be recovered to any address
    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] CryptoError),

    /// A recovered signer does not hold the required role
    #[error("Signer {signer} does not satisfy the {role} requirement")]
    RoleMismatch {
        /// The recovered signer
        signer: colony_common::Address,
        /// The role (or consent slot) the signer had to satisfy
        role: Role,
    },

    /// The nonce embedded in the signed message is not the task's current one
    #[error("Stale nonce: signed {signed}, current {current}")]
    StaleNonce {
        /// The nonce the signers used
        signed: u64,
        /// The task's current nonce
        current: u64,
    },

    /// The selector has no registry entry
    #[error("Unknown operation selector: {0}")]
    UnknownSelector(crate::selector::Selector),

    /// The call parameters could not be canonically encoded
    #[error("Call encoding failed: {0}")]
    EncodingFailed(String),
}

/// Result type for authorization operations
pub type AuthorizationResult<T> = Result<T, AuthorizationError>;
