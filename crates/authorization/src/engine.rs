//! The authorization engine
//!
//! Pure verification: given the requirement for an operation, the task's
//! current nonce, its role holders, the encoded call, and the claimed
//! signatures, decide whether the call is authorized. The engine never
//! mutates anything; the facade advances the task nonce only after the
//! whole operation has succeeded, which keeps a failed call free of side
//! effects.

use tracing::debug;

use colony_common::{Address, TaskId};
use colony_tasks::{Role, RoleAssignments};

use crate::call::{call_message, CallAuthorization, EncodedCall};
use crate::error::{AuthorizationError, AuthorizationResult};
use crate::registry::{ReviewerRegistry, Reviewers};
use crate::selector::Selector;

/// What a single signature slot must prove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerRequirement {
    /// The signer currently holds this role on the task
    HoldsRole(Role),
    /// The signer is exactly this address (self-consent to taking `role`)
    Exactly {
        /// The role being assigned, reported on mismatch
        role: Role,
        /// The consenting address
        address: Address,
    },
}

/// The signature slots an operation requires, in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// One signature satisfying the single slot
    Single(SignerRequirement),
    /// Two signatures, first slot then second slot
    Pair(SignerRequirement, SignerRequirement),
}

impl Requirement {
    /// Build the requirement for a fixed role pair; the same role twice
    /// collapses to a single signature
    pub fn of_roles(first: Role, second: Role) -> Self {
        if first == second {
            Requirement::Single(SignerRequirement::HoldsRole(first))
        } else {
            Requirement::Pair(
                SignerRequirement::HoldsRole(first),
                SignerRequirement::HoldsRole(second),
            )
        }
    }

    /// Build the requirement for a role assignment: manager plus the
    /// assignee's own signature, collapsing to a single manager signature
    /// when the assignee already is the manager
    pub fn manager_and_assignee(role: Role, assignee: Address, manager: Address) -> Self {
        if assignee == manager {
            Requirement::Single(SignerRequirement::HoldsRole(Role::Manager))
        } else {
            Requirement::Pair(
                SignerRequirement::HoldsRole(Role::Manager),
                SignerRequirement::Exactly {
                    role,
                    address: assignee,
                },
            )
        }
    }

    /// The number of signatures this requirement demands
    pub fn signature_count(&self) -> usize {
        match self {
            Requirement::Single(_) => 1,
            Requirement::Pair(_, _) => 2,
        }
    }

    fn slots(&self) -> Vec<SignerRequirement> {
        match self {
            Requirement::Single(slot) => vec![*slot],
            Requirement::Pair(first, second) => vec![*first, *second],
        }
    }
}

/// Verifies co-signed calls against the reviewer registry
#[derive(Debug, Clone)]
pub struct AuthorizationEngine {
    registry: ReviewerRegistry,
}

impl AuthorizationEngine {
    /// Create an engine over a registry; the registry is immutable from
    /// here on
    pub fn new(registry: ReviewerRegistry) -> Self {
        Self { registry }
    }

    /// The registry this engine consults
    pub fn registry(&self) -> &ReviewerRegistry {
        &self.registry
    }

    /// Resolve the requirement for a selector. Role assignments need the
    /// assignee and the current manager to shape the self-consent slot.
    pub fn requirement_for(
        &self,
        selector: Selector,
        assignment: Option<(Role, Address)>,
        manager: Address,
    ) -> AuthorizationResult<Requirement> {
        let reviewers = self
            .registry
            .reviewers(selector)
            .ok_or(AuthorizationError::UnknownSelector(selector))?;
        match reviewers {
            Reviewers::Roles(first, second) => Ok(Requirement::of_roles(first, second)),
            Reviewers::ManagerAndAssignee => {
                let (role, assignee) = assignment.ok_or_else(|| {
                    AuthorizationError::EncodingFailed(
                        "role assignment call without an assignee".to_string(),
                    )
                })?;
                Ok(Requirement::manager_and_assignee(role, assignee, manager))
            }
        }
    }

    /// Verify a co-signed call.
    ///
    /// Checks, in order: the embedded nonce matches the task's current
    /// nonce, the signature count matches the requirement, and each
    /// signature recovers to an address satisfying its slot. Signers are
    /// matched positionally — the first signature must satisfy the first
    /// slot.
    pub fn authorize(
        &self,
        requirement: Requirement,
        task_id: TaskId,
        current_nonce: u64,
        roles: &RoleAssignments,
        call: &EncodedCall,
        auth: &CallAuthorization,
    ) -> AuthorizationResult<()> {
        if auth.nonce != current_nonce {
            return Err(AuthorizationError::StaleNonce {
                signed: auth.nonce,
                current: current_nonce,
            });
        }

        let expected = requirement.signature_count();
        if auth.signatures.len() != expected {
            return Err(AuthorizationError::BadSignatureCount {
                expected,
                actual: auth.signatures.len(),
            });
        }

        let message = call_message(task_id, auth.nonce, call);
        for (signature, slot) in auth.signatures.iter().zip(requirement.slots()) {
            let signer = signature.recover(&message)?;
            match slot {
                SignerRequirement::HoldsRole(role) => {
                    if roles.holder(role) != Some(signer) {
                        return Err(AuthorizationError::RoleMismatch { signer, role });
                    }
                }
                SignerRequirement::Exactly { role, address } => {
                    if signer != address {
                        return Err(AuthorizationError::RoleMismatch { signer, role });
                    }
                }
            }
        }

        debug!(task = %task_id, selector = %call.selector, nonce = auth.nonce, "call authorized");
        Ok(())
    }
}
