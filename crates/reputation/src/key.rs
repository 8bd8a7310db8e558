//! The reputation key codec
//!
//! A reputation entry is keyed by `(colony, skill, user)` in a fixed
//! 72-byte big-endian layout: 20 bytes colony address, 32 bytes skill id,
//! 20 bytes user address. The skill id occupies the low 8 bytes of its
//! field; the remaining 24 must be zero.

use serde::{Deserialize, Serialize};

use colony_common::{Address, SkillId};

use crate::error::{ProofError, ProofResult};

/// Byte length of an encoded reputation key
pub const KEY_LEN: usize = 72;

/// A decoded reputation key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationKey {
    /// The colony the reputation was earned in
    pub colony: Address,
    /// The skill it was earned for
    pub skill_id: SkillId,
    /// The member holding it
    pub user: Address,
}

impl ReputationKey {
    /// Encode into the fixed 72-byte layout
    pub fn to_bytes(&self) -> [u8; KEY_LEN] {
        let mut out = [0u8; KEY_LEN];
        out[..20].copy_from_slice(self.colony.as_bytes());
        out[44..52].copy_from_slice(&self.skill_id.to_be_bytes());
        out[52..].copy_from_slice(self.user.as_bytes());
        out
    }

    /// Decode from the fixed layout, checking length and field bounds
    pub fn from_bytes(bytes: &[u8]) -> ProofResult<Self> {
        if bytes.len() != KEY_LEN {
            return Err(ProofError::MalformedKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            )));
        }
        let colony = Address::from_slice(&bytes[..20])
            .map_err(|e| ProofError::MalformedKey(e.to_string()))?;
        if bytes[20..44].iter().any(|b| *b != 0) {
            return Err(ProofError::MalformedKey(
                "skill id exceeds 8 bytes".to_string(),
            ));
        }
        let mut skill = [0u8; 8];
        skill.copy_from_slice(&bytes[44..52]);
        let user = Address::from_slice(&bytes[52..])
            .map_err(|e| ProofError::MalformedKey(e.to_string()))?;
        Ok(Self {
            colony,
            skill_id: SkillId(u64::from_be_bytes(skill)),
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let key = ReputationKey {
            colony: Address([1u8; 20]),
            skill_id: SkillId(42),
            user: Address([2u8; 20]),
        };
        let bytes = key.to_bytes();
        assert_eq!(bytes.len(), KEY_LEN);
        assert_eq!(ReputationKey::from_bytes(&bytes).unwrap(), key);
    }

    #[test]
    fn test_layout_is_fixed() {
        let key = ReputationKey {
            colony: Address([0xaa; 20]),
            skill_id: SkillId(0x0102),
            user: Address([0xbb; 20]),
        };
        let bytes = key.to_bytes();
        assert!(bytes[..20].iter().all(|b| *b == 0xaa));
        assert!(bytes[20..44].iter().all(|b| *b == 0));
        assert_eq!(&bytes[44..52], &[0, 0, 0, 0, 0, 0, 1, 2]);
        assert!(bytes[52..].iter().all(|b| *b == 0xbb));
    }

    #[test]
    fn test_bad_length_rejected() {
        assert!(matches!(
            ReputationKey::from_bytes(&[0u8; 71]),
            Err(ProofError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_overflowing_skill_field_rejected() {
        let mut bytes = ReputationKey {
            colony: Address([1u8; 20]),
            skill_id: SkillId(1),
            user: Address([2u8; 20]),
        }
        .to_bytes();
        bytes[21] = 1;
        assert!(matches!(
            ReputationKey::from_bytes(&bytes),
            Err(ProofError::MalformedKey(_))
        ));
    }
}
