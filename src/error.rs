//! Top-level error type for the colony engine

use thiserror::Error;

use colony_authorization::AuthorizationError;
use colony_common::SkillId;
use colony_ledger::{IssuanceError, LedgerError};
use colony_reputation::ProofError;
use colony_tasks::LifecycleError;

/// Any error a colony operation can surface
#[derive(Error, Debug)]
pub enum ColonyError {
    /// The call's co-signatures do not authorize the operation
    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    /// The task's state machine rejected the transition
    #[error("Task lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// The pot or domain ledger rejected the operation
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Token issuance policy rejected the operation
    #[error("Issuance error: {0}")]
    Issuance(#[from] IssuanceError),

    /// The reputation proof failed verification
    #[error("Reputation error: {0}")]
    Reputation(#[from] ProofError),

    /// No such skill is registered
    #[error("Skill not found: {0}")]
    SkillNotFound(SkillId),
}

/// Result type for colony operations
pub type ColonyResult<T> = Result<T, ColonyError>;
