//! Colony event log
//!
//! Every state-changing operation appends an event, giving off-chain
//! observers an ordered record of what happened without replaying calls.

use serde::{Deserialize, Serialize};

use colony_common::{Address, DomainId, PotId, SkillId, TaskId, TokenId};
use colony_tasks::Role;

/// An entry in the colony's ordered event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColonyEvent {
    /// The colony came into existence
    ColonyInitialized {
        identity: Address,
        root_skill: SkillId,
    },
    /// A domain was added under a parent
    DomainAdded {
        domain: DomainId,
        parent: DomainId,
        pot: PotId,
    },
    /// A pot was allocated for a domain or a task
    PotAdded { pot: PotId },
    /// A task was created in a domain
    TaskAdded {
        task: TaskId,
        domain: DomainId,
        manager: Address,
        pot: PotId,
    },
    /// Funds moved between two pots
    FundsMoved {
        source: PotId,
        dest: PotId,
        token: TokenId,
        amount: u128,
    },
    /// A task settled its ratings and locked its payouts
    TaskFinalized { task: TaskId },
    /// A task was abandoned
    TaskCancelled { task: TaskId },
    /// A role holder collected their payout
    PayoutClaimed {
        task: TaskId,
        role: Role,
        token: TokenId,
        amount: u128,
        claimant: Address,
    },
    /// New supply entered the root pot
    TokensMinted { token: TokenId, amount: u128 },
}
