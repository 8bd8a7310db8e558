//! Error types for colony cryptography

use thiserror::Error;

/// Errors from signature and key handling
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The signature bytes could not be parsed or did not verify
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// The recovery identifier was out of range
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// A public or private key was malformed
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
