//! Identifier types used throughout the colony engine

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced when parsing an address from text
#[derive(Error, Debug)]
pub enum AddressError {
    /// The hex string could not be decoded
    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),

    /// The decoded value was not 20 bytes
    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// A 20-byte account address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The number of bytes in an address
    pub const LEN: usize = 20;

    /// The all-zero address
    pub fn zero() -> Self {
        Self([0u8; 20])
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Address as lowercase hex with a `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse an address from a hex string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Build an address from a byte slice, checking the length
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != Self::LEN {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// Get the numeric value
            pub fn value(&self) -> u64 {
                self.0
            }

            /// Big-endian byte representation, used in signed messages
            pub fn to_be_bytes(&self) -> [u8; 8] {
                self.0.to_be_bytes()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }
    };
}

id_type!(
    /// Identifier of a task, allocated monotonically from 1
    TaskId
);
id_type!(
    /// Identifier of an organizational domain; domain 1 is the root
    DomainId
);
id_type!(
    /// Identifier of a skill in the classification hierarchy
    SkillId
);
id_type!(
    /// Identifier of a funding pot; pot 1 belongs to domain 1
    PotId
);
id_type!(
    /// Identifier of a token accepted in pots and payouts
    TokenId
);
