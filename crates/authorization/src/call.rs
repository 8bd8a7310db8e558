//! Canonical call encoding and the signed authorization envelope

use serde::{Deserialize, Serialize};

use colony_common::TaskId;
use colony_crypto::{keccak256, Hash, RecoverableSignature};

use crate::error::{AuthorizationError, AuthorizationResult};
use crate::selector::Selector;

/// An operation call in its exact signed form: selector plus canonically
/// encoded parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedCall {
    /// The operation selector
    pub selector: Selector,
    /// Canonical parameter bytes (JSON of the operation's params struct,
    /// field order fixed by the struct definition)
    pub params: Vec<u8>,
}

impl EncodedCall {
    /// Encode a call from its selector and parameters struct
    pub fn new<P: Serialize>(selector: Selector, params: &P) -> AuthorizationResult<Self> {
        let params = serde_json::to_vec(params)
            .map_err(|e| AuthorizationError::EncodingFailed(e.to_string()))?;
        Ok(Self { selector, params })
    }
}

/// The 32-byte message reviewers sign: it binds the task, the task's
/// current nonce, and the exact encoded call, making each authorization
/// single-use and call-specific.
pub fn call_message(task_id: TaskId, nonce: u64, call: &EncodedCall) -> Hash {
    let mut data = Vec::with_capacity(8 + 8 + 4 + call.params.len());
    data.extend_from_slice(&task_id.to_be_bytes());
    data.extend_from_slice(&nonce.to_be_bytes());
    data.extend_from_slice(call.selector.as_bytes());
    data.extend_from_slice(&call.params);
    keccak256(&data)
}

/// The co-signatures accompanying a mutating call, together with the nonce
/// they were produced against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallAuthorization {
    /// The task nonce the signers embedded in the message
    pub nonce: u64,
    /// Reviewer signatures, in the registry's fixed order
    pub signatures: Vec<RecoverableSignature>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Params {
        value: u64,
    }

    #[test]
    fn test_message_binds_every_component() {
        let selector = Selector::of("op(u64)");
        let call = EncodedCall::new(selector, &Params { value: 7 }).unwrap();
        let base = call_message(TaskId(1), 0, &call);

        assert_ne!(base, call_message(TaskId(2), 0, &call));
        assert_ne!(base, call_message(TaskId(1), 1, &call));

        let other_params = EncodedCall::new(selector, &Params { value: 8 }).unwrap();
        assert_ne!(base, call_message(TaskId(1), 0, &other_params));

        let other_selector =
            EncodedCall::new(Selector::of("other(u64)"), &Params { value: 7 }).unwrap();
        assert_ne!(base, call_message(TaskId(1), 0, &other_selector));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let selector = Selector::of("op(u64)");
        let a = EncodedCall::new(selector, &Params { value: 7 }).unwrap();
        let b = EncodedCall::new(selector, &Params { value: 7 }).unwrap();
        assert_eq!(a, b);
    }
}
