//! Error types for task lifecycle operations

use colony_common::TaskId;
use thiserror::Error;

use crate::task::Role;

/// Errors raised when an operation is invalid for the current task state
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    /// No task exists with the given id
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// The operation is not permitted in the task's current state
    #[error("Invalid state for operation: {0}")]
    InvalidStateForOperation(String),

    /// A role slot that the operation needs is still unassigned
    #[error("Role not assigned: {0}")]
    RoleNotAssigned(Role),

    /// The caller does not hold the role the operation requires
    #[error("Caller does not hold role: {0}")]
    NotRoleHolder(Role),

    /// A rating secret was already submitted for this role
    #[error("Rating secret already set for role: {0}")]
    SecretAlreadySet(Role),

    /// The rating for this role was already revealed
    #[error("Rating already revealed for role: {0}")]
    AlreadyRevealed(Role),

    /// The revealed salt and score do not hash to the stored secret
    #[error("Revealed rating does not match the committed secret")]
    RatingMismatch,

    /// The score is outside the accepted range
    #[error("Rating score out of range: {0}")]
    InvalidRating(u8),

    /// The committed payout total does not fit in a u128
    #[error("Committed payout total overflows")]
    PayoutOverflow,

    /// Payouts can only be claimed after finalization
    #[error("Task is not yet finalized")]
    NotYetFinalized,

    /// This payout was already claimed
    #[error("Payout already claimed")]
    AlreadyClaimed,
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
