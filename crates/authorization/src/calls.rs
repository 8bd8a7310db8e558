//! The mutating task operations: canonical signatures, selectors, and
//! parameter structs
//!
//! Reviewers sign over these exact encodings, so both the engine and its
//! callers build calls from this module.

use serde::{Deserialize, Serialize};

use colony_common::{SkillId, TaskId, TokenId};
use colony_crypto::Hash;
use colony_tasks::Role;

use crate::selector::Selector;

/// Canonical signature strings for every registered operation
pub mod signatures {
    pub const SET_TASK_BRIEF: &str = "set_task_brief(u64,bytes32)";
    pub const SET_TASK_DUE_DATE: &str = "set_task_due_date(u64,u64)";
    pub const SET_TASK_SKILL: &str = "set_task_skill(u64,u64)";
    pub const SET_TASK_MANAGER_ROLE: &str = "set_task_manager_role(u64,address)";
    pub const SET_TASK_EVALUATOR_ROLE: &str = "set_task_evaluator_role(u64,address)";
    pub const SET_TASK_WORKER_ROLE: &str = "set_task_worker_role(u64,address)";
    pub const SET_TASK_MANAGER_PAYOUT: &str = "set_task_manager_payout(u64,u64,u128)";
    pub const SET_TASK_EVALUATOR_PAYOUT: &str = "set_task_evaluator_payout(u64,u64,u128)";
    pub const SET_TASK_WORKER_PAYOUT: &str = "set_task_worker_payout(u64,u64,u128)";
    pub const FINALIZE_TASK: &str = "finalize_task(u64)";
    pub const CANCEL_TASK: &str = "cancel_task(u64)";
}

/// Selector for the brief mutation
pub fn set_task_brief() -> Selector {
    Selector::of(signatures::SET_TASK_BRIEF)
}

/// Selector for the due-date mutation
pub fn set_task_due_date() -> Selector {
    Selector::of(signatures::SET_TASK_DUE_DATE)
}

/// Selector for the skill mutation
pub fn set_task_skill() -> Selector {
    Selector::of(signatures::SET_TASK_SKILL)
}

/// Selector for assigning the given role
pub fn set_task_role(role: Role) -> Selector {
    match role {
        Role::Manager => Selector::of(signatures::SET_TASK_MANAGER_ROLE),
        Role::Evaluator => Selector::of(signatures::SET_TASK_EVALUATOR_ROLE),
        Role::Worker => Selector::of(signatures::SET_TASK_WORKER_ROLE),
    }
}

/// Selector for setting the given role's payout
pub fn set_task_payout(role: Role) -> Selector {
    match role {
        Role::Manager => Selector::of(signatures::SET_TASK_MANAGER_PAYOUT),
        Role::Evaluator => Selector::of(signatures::SET_TASK_EVALUATOR_PAYOUT),
        Role::Worker => Selector::of(signatures::SET_TASK_WORKER_PAYOUT),
    }
}

/// Selector for finalization
pub fn finalize_task() -> Selector {
    Selector::of(signatures::FINALIZE_TASK)
}

/// Selector for cancellation
pub fn cancel_task() -> Selector {
    Selector::of(signatures::CANCEL_TASK)
}

/// Parameters of the brief mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTaskBrief {
    pub task: TaskId,
    pub brief: Hash,
}

/// Parameters of the due-date mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTaskDueDate {
    pub task: TaskId,
    pub due_date: u64,
}

/// Parameters of the skill mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTaskSkill {
    pub task: TaskId,
    pub skill: SkillId,
}

/// Parameters of a role assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTaskRole {
    pub task: TaskId,
    pub role: Role,
    pub address: colony_common::Address,
}

/// Parameters of a payout mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTaskPayout {
    pub task: TaskId,
    pub role: Role,
    pub token: TokenId,
    pub amount: u128,
}

/// Parameters of finalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeTask {
    pub task: TaskId,
}

/// Parameters of cancellation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelTask {
    pub task: TaskId,
}
