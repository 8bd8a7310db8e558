//! Colony: a role-gated task governance engine
//!
//! A colony organizes collaborative work into domains and tasks. Funds live
//! in per-domain and per-task pots; mutating a task requires co-signatures
//! from the reviewer pair registered for the operation, replay-protected by
//! a per-task nonce. Work is scored through a commit-reveal rating
//! exchange, payouts unlock at finalization, and new token supply enters
//! under a rate-limited issuance schedule. Members prove their standing
//! with compact Merkle proofs against an externally published reputation
//! root.
//!
//! The member crates each own one concern; this crate ties them together
//! behind the [`Colony`] facade.

pub mod clock;
pub mod colony;
pub mod error;
pub mod events;
pub mod skills;

pub use clock::{Clock, ManualClock, SystemClock};
pub use colony::Colony;
pub use error::{ColonyError, ColonyResult};
pub use events::ColonyEvent;
pub use skills::{InMemorySkillRegistry, SkillRegistry};

pub use colony_authorization as authorization;
pub use colony_common as common;
pub use colony_crypto as crypto;
pub use colony_ledger as ledger;
pub use colony_reputation as reputation;
pub use colony_tasks as tasks;
