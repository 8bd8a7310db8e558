//! Task lifecycle for the Colony governance engine
//!
//! This crate provides the task record and its state machine: role
//! assignment, payout bookkeeping, the commit-reveal work-rating protocol,
//! finalization, and payout claims. Every transition validates its
//! preconditions before touching state, so a rejected call leaves the task
//! exactly as it was. Authorization of who may trigger a transition lives
//! in `colony-authorization`; this crate only enforces what the current
//! task state permits.

pub mod error;
pub mod task;

pub use error::{LifecycleError, LifecycleResult};
pub use task::{Payout, RatingState, Role, RoleAssignments, Task, TaskStatus};
