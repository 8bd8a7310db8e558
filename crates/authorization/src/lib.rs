//! Role-based multi-signature authorization
//!
//! Every mutating task operation is identified by a 4-byte selector and
//! gated on co-signatures from the pair of reviewers the registry mandates
//! for it. The engine verifies each signature against a message binding the
//! task id, the task's current nonce, and the exact encoded call, so an
//! authorized message is usable exactly once and only for the call it was
//! produced for.

pub mod call;
pub mod calls;
pub mod engine;
pub mod error;
pub mod registry;
pub mod selector;

pub use call::{call_message, CallAuthorization, EncodedCall};
pub use engine::{AuthorizationEngine, Requirement, SignerRequirement};
pub use error::{AuthorizationError, AuthorizationResult};
pub use registry::{ReviewerRegistry, Reviewers};
pub use selector::Selector;
