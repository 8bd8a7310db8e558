//! Cryptographic primitives for the Colony governance engine
//!
//! This crate provides Keccak-256 hashing, recoverable secp256k1 signatures
//! in the two encodings the authorization protocol accepts, and the
//! commit-reveal secret construction used by task ratings.

pub mod error;
pub mod hash;
pub mod keys;
pub mod signature;

pub use error::{CryptoError, CryptoResult};
pub use hash::{keccak256, rating_secret, Hash};
pub use keys::Keypair;
pub use signature::{RecoverableSignature, SignatureKind};
