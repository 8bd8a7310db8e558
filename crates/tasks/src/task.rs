//! Task records and their state machine

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use colony_common::{Address, PotId, SkillId, TaskId, TokenId};
use colony_crypto::{rating_secret, Hash};

use crate::error::{LifecycleError, LifecycleResult};

/// The three roles a task carries. Exactly one address may hold each role
/// per task; the same address may hold several roles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Role {
    /// Creates the task, co-signs every mutation
    Manager,
    /// Rates the worker's output
    Evaluator,
    /// Delivers the work, rates the manager
    Worker,
}

impl Role {
    /// The two roles that receive a work rating
    pub const RATED: [Role; 2] = [Role::Manager, Role::Worker];

    /// The counter-party that rates this role, if it is rated at all:
    /// the Evaluator rates the Worker and the Worker rates the Manager.
    pub fn rated_by(&self) -> Option<Role> {
        match self {
            Role::Worker => Some(Role::Evaluator),
            Role::Manager => Some(Role::Worker),
            Role::Evaluator => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Manager => write!(f, "manager"),
            Role::Evaluator => write!(f, "evaluator"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Open for mutation through authorized operations
    Active,
    /// Ratings settled, payouts locked for claiming
    Finalized,
    /// Abandoned before finalization, terminal
    Cancelled,
}

/// The addresses holding each role. The manager is fixed at creation and
/// may only change through an authorized reassignment; the other two slots
/// start empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignments {
    /// Holder of the Manager role
    pub manager: Address,
    /// Holder of the Evaluator role, once assigned
    pub evaluator: Option<Address>,
    /// Holder of the Worker role, once assigned
    pub worker: Option<Address>,
}

impl RoleAssignments {
    /// The current holder of a role
    pub fn holder(&self, role: Role) -> Option<Address> {
        match role {
            Role::Manager => Some(self.manager),
            Role::Evaluator => self.evaluator,
            Role::Worker => self.worker,
        }
    }

    fn assign(&mut self, role: Role, address: Address) {
        match role {
            Role::Manager => self.manager = address,
            Role::Evaluator => self.evaluator = Some(address),
            Role::Worker => self.worker = Some(address),
        }
    }
}

/// A committed payout for one role in one token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    /// The role the payout belongs to
    pub role: Role,
    /// The token it is denominated in
    pub token: TokenId,
    /// The committed amount
    pub amount: u128,
    /// Set once the holder has claimed, preventing a second claim
    pub claimed: bool,
}

/// Commit-reveal state for one rated role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingState {
    /// The committed `keccak(salt ‖ score)` secret, write-once
    pub secret: Option<Hash>,
    /// The revealed score, set at most once and only against the secret
    pub score: Option<u8>,
}

/// A unit of work: roles, payouts, ratings, and a funding pot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Monotonically allocated identifier
    pub id: TaskId,
    /// Skill classification of the work
    pub skill_id: SkillId,
    /// The funding pot owned exclusively by this task until finalization
    pub pot_id: PotId,
    /// Deadline for the work, seconds since the epoch
    pub due_date: Option<u64>,
    /// Content hash of the work brief
    pub brief: Option<Hash>,
    /// Role holders
    pub roles: RoleAssignments,
    /// Committed payouts
    pub payouts: Vec<Payout>,
    /// Commit-reveal rating state per rated role
    pub ratings: BTreeMap<Role, RatingState>,
    /// Lifecycle status
    pub status: TaskStatus,
}

impl Task {
    /// Create a new active task; the creator becomes the Manager
    pub fn new(id: TaskId, manager: Address, skill_id: SkillId, pot_id: PotId) -> Self {
        let mut ratings = BTreeMap::new();
        for role in Role::RATED {
            ratings.insert(role, RatingState::default());
        }
        Self {
            id,
            skill_id,
            pot_id,
            due_date: None,
            brief: None,
            roles: RoleAssignments {
                manager,
                evaluator: None,
                worker: None,
            },
            payouts: Vec::new(),
            ratings,
            status: TaskStatus::Active,
        }
    }

    /// Reject any mutation of a finalized or cancelled task
    pub fn ensure_active(&self) -> LifecycleResult<()> {
        match self.status {
            TaskStatus::Active => Ok(()),
            other => Err(LifecycleError::InvalidStateForOperation(format!(
                "task {} is {:?}",
                self.id, other
            ))),
        }
    }

    /// Set the work brief hash
    pub fn set_brief(&mut self, brief: Hash) -> LifecycleResult<()> {
        self.ensure_active()?;
        self.brief = Some(brief);
        Ok(())
    }

    /// Set the due date
    pub fn set_due_date(&mut self, due_date: u64) -> LifecycleResult<()> {
        self.ensure_active()?;
        self.due_date = Some(due_date);
        Ok(())
    }

    /// Reclassify the task under a different skill
    pub fn set_skill(&mut self, skill_id: SkillId) -> LifecycleResult<()> {
        self.ensure_active()?;
        self.skill_id = skill_id;
        Ok(())
    }

    /// Assign a role holder. Authorization (manager plus the assignee's own
    /// consent) is checked by the engine before this is reached.
    pub fn set_role(&mut self, role: Role, address: Address) -> LifecycleResult<()> {
        self.ensure_active()?;
        self.roles.assign(role, address);
        Ok(())
    }

    /// The committed, still-unclaimed payout total in one token. Used to
    /// keep the task pot from being drained below its obligations.
    pub fn committed_total(&self, token: TokenId) -> u128 {
        self.payouts
            .iter()
            .filter(|p| p.token == token && !p.claimed)
            .map(|p| p.amount)
            .sum()
    }

    /// What the committed total in `token` would become if `role`'s payout
    /// were set to `amount`. The engine compares this against the pot
    /// balance before committing.
    pub fn committed_total_with(
        &self,
        role: Role,
        token: TokenId,
        amount: u128,
    ) -> LifecycleResult<u128> {
        self.payouts
            .iter()
            .filter(|p| p.token == token && p.role != role)
            .try_fold(amount, |total, p| total.checked_add(p.amount))
            .ok_or(LifecycleError::PayoutOverflow)
    }

    /// Record a payout, replacing any earlier amount for the same role and
    /// token. The pot-balance check happens in the engine first.
    pub fn record_payout(
        &mut self,
        role: Role,
        token: TokenId,
        amount: u128,
    ) -> LifecycleResult<()> {
        self.ensure_active()?;
        if let Some(existing) = self
            .payouts
            .iter_mut()
            .find(|p| p.role == role && p.token == token)
        {
            existing.amount = amount;
        } else {
            self.payouts.push(Payout {
                role,
                token,
                amount,
                claimed: false,
            });
        }
        Ok(())
    }

    /// Resolve the address required to rate `rated`
    fn rater_of(&self, rated: Role) -> LifecycleResult<Address> {
        let rater = rated.rated_by().ok_or_else(|| {
            LifecycleError::InvalidStateForOperation(format!("role {} is not rated", rated))
        })?;
        self.roles
            .holder(rater)
            .ok_or(LifecycleError::RoleNotAssigned(rater))
    }

    /// Submit the hashed rating secret for `rated`. Only the counter-party
    /// may call, and only once per role.
    pub fn submit_rating(
        &mut self,
        rated: Role,
        secret: Hash,
        caller: Address,
    ) -> LifecycleResult<()> {
        self.ensure_active()?;
        let rater = self.rater_of(rated)?;
        if caller != rater {
            return Err(LifecycleError::NotRoleHolder(
                rated.rated_by().expect("rated role has a rater"),
            ));
        }
        let state = self
            .ratings
            .get_mut(&rated)
            .expect("rated roles are seeded at creation");
        if state.secret.is_some() {
            return Err(LifecycleError::SecretAlreadySet(rated));
        }
        state.secret = Some(secret);
        Ok(())
    }

    /// Reveal the rating for `rated` against the committed secret.
    ///
    /// Out-of-range scores are rejected before the hash comparison since
    /// they can never match a well-formed secret.
    pub fn reveal_rating(
        &mut self,
        rated: Role,
        score: u8,
        salt: &[u8; 32],
        caller: Address,
        min_score: u8,
        max_score: u8,
    ) -> LifecycleResult<()> {
        self.ensure_active()?;
        if score < min_score || score > max_score {
            return Err(LifecycleError::InvalidRating(score));
        }
        let rater = self.rater_of(rated)?;
        if caller != rater {
            return Err(LifecycleError::NotRoleHolder(
                rated.rated_by().expect("rated role has a rater"),
            ));
        }
        let state = self
            .ratings
            .get_mut(&rated)
            .expect("rated roles are seeded at creation");
        let secret = state.secret.ok_or_else(|| {
            LifecycleError::InvalidStateForOperation(format!(
                "no rating secret submitted for {}",
                rated
            ))
        })?;
        if state.score.is_some() {
            return Err(LifecycleError::AlreadyRevealed(rated));
        }
        if rating_secret(salt, score) != secret {
            return Err(LifecycleError::RatingMismatch);
        }
        state.score = Some(score);
        Ok(())
    }

    /// Whether both rated roles have a revealed score
    pub fn ratings_complete(&self) -> bool {
        Role::RATED
            .iter()
            .all(|r| self.ratings.get(r).and_then(|s| s.score).is_some())
    }

    /// Finalize the task, locking payouts for claiming.
    ///
    /// Before the reveal window past the due date has closed, both ratings
    /// must be revealed. Afterwards, unrevealed ratings take the neutral
    /// default score.
    pub fn finalize(
        &mut self,
        now: u64,
        reveal_window_secs: u64,
        default_rating: u8,
    ) -> LifecycleResult<()> {
        self.ensure_active()?;
        if !self.ratings_complete() {
            let deadline = self
                .due_date
                .map(|d| d.saturating_add(reveal_window_secs));
            match deadline {
                Some(deadline) if now >= deadline => {
                    for state in self.ratings.values_mut() {
                        if state.score.is_none() {
                            state.score = Some(default_rating);
                        }
                    }
                }
                _ => {
                    return Err(LifecycleError::InvalidStateForOperation(
                        "ratings not complete and reveal window still open".to_string(),
                    ))
                }
            }
        }
        self.status = TaskStatus::Finalized;
        Ok(())
    }

    /// Cancel the task. Terminal; nothing can be mutated or claimed after.
    pub fn cancel(&mut self) -> LifecycleResult<()> {
        self.ensure_active()?;
        self.status = TaskStatus::Cancelled;
        Ok(())
    }

    /// The amount a claim by `caller` for `role` in `token` would release,
    /// fully validated but without mutating. The engine settles the pot
    /// against this before marking the claim.
    pub fn claimable_payout(
        &self,
        role: Role,
        token: TokenId,
        caller: Address,
    ) -> LifecycleResult<u128> {
        if self.status != TaskStatus::Finalized {
            return Err(LifecycleError::NotYetFinalized);
        }
        let holder = self
            .roles
            .holder(role)
            .ok_or(LifecycleError::RoleNotAssigned(role))?;
        if caller != holder {
            return Err(LifecycleError::NotRoleHolder(role));
        }
        let payout = self
            .payouts
            .iter()
            .find(|p| p.role == role && p.token == token)
            .ok_or_else(|| {
                LifecycleError::InvalidStateForOperation(format!(
                    "no payout set for {} in token {}",
                    role, token
                ))
            })?;
        if payout.claimed {
            return Err(LifecycleError::AlreadyClaimed);
        }
        Ok(payout.amount)
    }

    /// Claim the payout for `role` in `token`, exactly once, after
    /// finalization. Returns the amount released.
    pub fn claim_payout(
        &mut self,
        role: Role,
        token: TokenId,
        caller: Address,
    ) -> LifecycleResult<u128> {
        let amount = self.claimable_payout(role, token, caller)?;
        if let Some(payout) = self
            .payouts
            .iter_mut()
            .find(|p| p.role == role && p.token == token)
        {
            payout.claimed = true;
        }
        Ok(amount)
    }
}
