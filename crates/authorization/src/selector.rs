//! Operation selectors
//!
//! Each mutating operation is identified by the first four bytes of the
//! Keccak-256 of its canonical signature string.

use serde::{Deserialize, Serialize};
use std::fmt;

use colony_crypto::keccak256;

/// A 4-byte operation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// Derive the selector for a canonical signature string such as
    /// `set_task_brief(u64,bytes32)`
    pub fn of(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        let mut out = [0u8; 4];
        out.copy_from_slice(&hash.as_bytes()[..4]);
        Self(out)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_stable() {
        assert_eq!(Selector::of("set_task_brief(u64,bytes32)"),
                   Selector::of("set_task_brief(u64,bytes32)"));
    }

    #[test]
    fn test_distinct_signatures_distinct_selectors() {
        assert_ne!(
            Selector::of("set_task_brief(u64,bytes32)"),
            Selector::of("set_task_due_date(u64,u64)")
        );
    }
}
