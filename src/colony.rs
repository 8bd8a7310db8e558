//! The colony engine facade
//!
//! One `Colony` owns the whole governance state: the domain tree and its
//! pots, the tasks with their nonces, the issuance controller, and the
//! event log. Mutating task operations come in as co-signed calls and are
//! verified by the authorization engine before any state changes; the
//! task's nonce advances only after the operation has fully succeeded, so
//! a rejected call leaves no trace and a succeeded one retires its
//! signatures.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use colony_authorization::calls::{
    self, CancelTask, FinalizeTask, SetTaskBrief, SetTaskDueDate, SetTaskPayout, SetTaskRole,
    SetTaskSkill,
};
use colony_authorization::{AuthorizationEngine, CallAuthorization, EncodedCall, ReviewerRegistry};
use colony_common::{Address, ColonyConfig, DomainId, PotId, SkillId, TaskId, TokenId};
use colony_crypto::Hash;
use colony_ledger::{
    Domain, DomainRegistry, IssuanceRate, LedgerError, PotLedger, TokenIssuanceController,
};
use colony_reputation::{
    BranchMask, ReputationKey, ReputationProofVerifier, ReputationRootOracle,
};
use colony_tasks::{LifecycleError, Role, Task};

use crate::clock::{Clock, SystemClock};
use crate::error::{ColonyError, ColonyResult};
use crate::events::ColonyEvent;
use crate::skills::SkillRegistry;

/// Everything behind the colony's single write lock. Operations validate
/// against this state in full before mutating any of it.
struct ColonyState {
    tasks: HashMap<TaskId, Task>,
    next_task: u64,
    /// Per-task authorization nonce, advanced after each authorized call
    nonces: HashMap<TaskId, u64>,
    /// Which task owns which pot, for funding-flow checks
    task_by_pot: HashMap<PotId, TaskId>,
    domains: DomainRegistry,
    pots: PotLedger,
    issuance: TokenIssuanceController,
    events: Vec<ColonyEvent>,
}

/// A running colony
pub struct Colony {
    identity: Address,
    native_token: TokenId,
    config: ColonyConfig,
    engine: AuthorizationEngine,
    verifier: ReputationProofVerifier,
    skills: Arc<dyn SkillRegistry>,
    reputation_root: Arc<dyn ReputationRootOracle>,
    clock: Arc<dyn Clock>,
    state: Arc<RwLock<ColonyState>>,
}

impl Colony {
    /// Create a colony on the wall clock
    pub fn new(
        identity: Address,
        config: ColonyConfig,
        root_skill: SkillId,
        skills: Arc<dyn SkillRegistry>,
        reputation_root: Arc<dyn ReputationRootOracle>,
    ) -> Self {
        Self::with_clock(
            identity,
            config,
            root_skill,
            skills,
            reputation_root,
            Arc::new(SystemClock),
        )
    }

    /// Create a colony on an explicit time source
    pub fn with_clock(
        identity: Address,
        config: ColonyConfig,
        root_skill: SkillId,
        skills: Arc<dyn SkillRegistry>,
        reputation_root: Arc<dyn ReputationRootOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let issuance = TokenIssuanceController::new(
            config.supply_ceiling,
            config.issuance_cooldown_secs,
            clock.now(),
        );
        let state = ColonyState {
            tasks: HashMap::new(),
            next_task: 1,
            nonces: HashMap::new(),
            task_by_pot: HashMap::new(),
            domains: DomainRegistry::new(root_skill),
            pots: PotLedger::new(),
            issuance,
            events: vec![ColonyEvent::ColonyInitialized {
                identity,
                root_skill,
            }],
        };
        info!(%identity, %root_skill, "colony initialized");
        Self {
            identity,
            native_token: TokenId(1),
            config,
            engine: AuthorizationEngine::new(ReviewerRegistry::standard()),
            verifier: ReputationProofVerifier::new(identity),
            skills,
            reputation_root,
            clock,
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// The colony's own address
    pub fn identity(&self) -> Address {
        self.identity
    }

    /// The colony's native token
    pub fn native_token(&self) -> TokenId {
        self.native_token
    }

    /// The policy configuration
    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    // --- domains and funding ---

    /// Add a child domain under `parent`, with a fresh skill and pot
    pub async fn add_domain(&self, parent: DomainId) -> ColonyResult<DomainId> {
        let mut state = self.state.write().await;
        state.domains.domain(parent)?;
        let skill = self.skills.add_skill().await;
        let pot = state.pots.add_pot();
        let id = state.domains.add_domain(parent, skill, pot)?;
        state.events.push(ColonyEvent::PotAdded { pot });
        state.events.push(ColonyEvent::DomainAdded {
            domain: id,
            parent,
            pot,
        });
        Ok(id)
    }

    /// Move funds between pots.
    ///
    /// A task pot never drops below its unclaimed payout commitments, and
    /// a finalized or cancelled task accepts no further funding.
    pub async fn move_funds(
        &self,
        source: PotId,
        dest: PotId,
        token: TokenId,
        amount: u128,
    ) -> ColonyResult<()> {
        let mut state = self.state.write().await;
        let floor = match state.task_by_pot.get(&source) {
            Some(task_id) => {
                let task = Self::task_ref(&state, *task_id)?;
                task.committed_total(token)
            }
            None => 0,
        };
        if let Some(task_id) = state.task_by_pot.get(&dest) {
            Self::task_ref(&state, *task_id)?.ensure_active()?;
        }
        state.pots.move_funds(source, dest, token, amount, floor)?;
        state.events.push(ColonyEvent::FundsMoved {
            source,
            dest,
            token,
            amount,
        });
        Ok(())
    }

    // --- tasks ---

    /// Create a task in a domain; the creator becomes its manager and the
    /// task gets a pot of its own
    pub async fn create_task(
        &self,
        manager: Address,
        domain: DomainId,
        skill: SkillId,
    ) -> ColonyResult<TaskId> {
        if !self.skills.skill_exists(skill).await {
            return Err(ColonyError::SkillNotFound(skill));
        }
        let mut state = self.state.write().await;
        state.domains.domain(domain)?;
        let pot = state.pots.add_pot();
        let id = TaskId(state.next_task);
        state.next_task += 1;
        state.tasks.insert(id, Task::new(id, manager, skill, pot));
        state.nonces.insert(id, 0);
        state.task_by_pot.insert(pot, id);
        state.events.push(ColonyEvent::PotAdded { pot });
        state.events.push(ColonyEvent::TaskAdded {
            task: id,
            domain,
            manager,
            pot,
        });
        info!(task = %id, %domain, %manager, "task created");
        Ok(id)
    }

    /// Set a task's work brief (manager + worker co-sign)
    pub async fn set_task_brief(
        &self,
        params: SetTaskBrief,
        auth: &CallAuthorization,
    ) -> ColonyResult<()> {
        let call = EncodedCall::new(calls::set_task_brief(), &params)?;
        let mut state = self.state.write().await;
        self.authorize(&state, params.task, &call, None, auth)?;
        Self::task_mut(&mut state, params.task)?.set_brief(params.brief)?;
        Self::bump_nonce(&mut state, params.task);
        Ok(())
    }

    /// Set a task's due date (manager + worker co-sign)
    pub async fn set_task_due_date(
        &self,
        params: SetTaskDueDate,
        auth: &CallAuthorization,
    ) -> ColonyResult<()> {
        let call = EncodedCall::new(calls::set_task_due_date(), &params)?;
        let mut state = self.state.write().await;
        self.authorize(&state, params.task, &call, None, auth)?;
        Self::task_mut(&mut state, params.task)?.set_due_date(params.due_date)?;
        Self::bump_nonce(&mut state, params.task);
        Ok(())
    }

    /// Reclassify a task under a different skill (manager + worker co-sign)
    pub async fn set_task_skill(
        &self,
        params: SetTaskSkill,
        auth: &CallAuthorization,
    ) -> ColonyResult<()> {
        if !self.skills.skill_exists(params.skill).await {
            return Err(ColonyError::SkillNotFound(params.skill));
        }
        let call = EncodedCall::new(calls::set_task_skill(), &params)?;
        let mut state = self.state.write().await;
        self.authorize(&state, params.task, &call, None, auth)?;
        Self::task_mut(&mut state, params.task)?.set_skill(params.skill)?;
        Self::bump_nonce(&mut state, params.task);
        Ok(())
    }

    /// Assign a role holder (manager co-signs with the assignee)
    pub async fn set_task_role(
        &self,
        params: SetTaskRole,
        auth: &CallAuthorization,
    ) -> ColonyResult<()> {
        let call = EncodedCall::new(calls::set_task_role(params.role), &params)?;
        let mut state = self.state.write().await;
        self.authorize(
            &state,
            params.task,
            &call,
            Some((params.role, params.address)),
            auth,
        )?;
        Self::task_mut(&mut state, params.task)?.set_role(params.role, params.address)?;
        Self::bump_nonce(&mut state, params.task);
        Ok(())
    }

    /// Commit a payout for a role.
    ///
    /// The task pot must cover all unclaimed commitments including the new
    /// amount, so a finalized task can always pay what it promised.
    pub async fn set_task_payout(
        &self,
        params: SetTaskPayout,
        auth: &CallAuthorization,
    ) -> ColonyResult<()> {
        let call = EncodedCall::new(calls::set_task_payout(params.role), &params)?;
        let mut state = self.state.write().await;
        self.authorize(&state, params.task, &call, None, auth)?;
        let task = Self::task_ref(&state, params.task)?;
        let pot = task.pot_id;
        let committed = task.committed_total_with(params.role, params.token, params.amount)?;
        let balance = state.pots.balance(pot, params.token)?;
        if committed > balance {
            return Err(LedgerError::PayoutExceedsPot {
                pot,
                committed,
                balance,
            }
            .into());
        }
        Self::task_mut(&mut state, params.task)?.record_payout(
            params.role,
            params.token,
            params.amount,
        )?;
        Self::bump_nonce(&mut state, params.task);
        Ok(())
    }

    /// Finalize a task (manager + worker co-sign), settling ratings and
    /// locking payouts for claiming
    pub async fn finalize_task(
        &self,
        params: FinalizeTask,
        auth: &CallAuthorization,
    ) -> ColonyResult<()> {
        let call = EncodedCall::new(calls::finalize_task(), &params)?;
        let mut state = self.state.write().await;
        self.authorize(&state, params.task, &call, None, auth)?;
        let now = self.clock.now();
        Self::task_mut(&mut state, params.task)?.finalize(
            now,
            self.config.rating_reveal_window_secs,
            self.config.default_rating,
        )?;
        Self::bump_nonce(&mut state, params.task);
        state.events.push(ColonyEvent::TaskFinalized { task: params.task });
        info!(task = %params.task, "task finalized");
        Ok(())
    }

    /// Cancel a task (manager + worker co-sign)
    pub async fn cancel_task(
        &self,
        params: CancelTask,
        auth: &CallAuthorization,
    ) -> ColonyResult<()> {
        let call = EncodedCall::new(calls::cancel_task(), &params)?;
        let mut state = self.state.write().await;
        self.authorize(&state, params.task, &call, None, auth)?;
        Self::task_mut(&mut state, params.task)?.cancel()?;
        Self::bump_nonce(&mut state, params.task);
        state.events.push(ColonyEvent::TaskCancelled { task: params.task });
        info!(task = %params.task, "task cancelled");
        Ok(())
    }

    // --- ratings ---

    /// Commit the hashed rating secret for `rated`; only its counter-party
    /// may call
    pub async fn submit_rating(
        &self,
        task: TaskId,
        rated: Role,
        secret: Hash,
        caller: Address,
    ) -> ColonyResult<()> {
        let mut state = self.state.write().await;
        Self::task_mut(&mut state, task)?.submit_rating(rated, secret, caller)?;
        debug!(%task, %rated, "rating secret submitted");
        Ok(())
    }

    /// Reveal a committed rating
    pub async fn reveal_rating(
        &self,
        task: TaskId,
        rated: Role,
        score: u8,
        salt: &[u8; 32],
        caller: Address,
    ) -> ColonyResult<()> {
        let mut state = self.state.write().await;
        Self::task_mut(&mut state, task)?.reveal_rating(
            rated,
            score,
            salt,
            caller,
            self.config.min_rating,
            self.config.max_rating,
        )?;
        debug!(%task, %rated, score, "rating revealed");
        Ok(())
    }

    // --- payouts ---

    /// Claim the caller's payout for `role` in `token`, once, after
    /// finalization. Returns the amount released to the claimant.
    pub async fn claim_payout(
        &self,
        task: TaskId,
        role: Role,
        token: TokenId,
        caller: Address,
    ) -> ColonyResult<u128> {
        let mut state = self.state.write().await;
        let record = Self::task_ref(&state, task)?;
        let pot = record.pot_id;
        // settle the pot first; the claim is marked only once the funds moved
        let amount = record.claimable_payout(role, token, caller)?;
        state.pots.debit(pot, token, amount)?;
        Self::task_mut(&mut state, task)?.claim_payout(role, token, caller)?;
        state.events.push(ColonyEvent::PayoutClaimed {
            task,
            role,
            token,
            amount,
            claimant: caller,
        });
        info!(%task, %role, amount, "payout claimed");
        Ok(amount)
    }

    // --- issuance ---

    /// Change the token emission rate; subject to the cooldown and the
    /// bounded rate-of-change, measured at `precision`
    pub async fn set_issuance_rate(
        &self,
        amount: u128,
        period: u64,
        precision: u128,
    ) -> ColonyResult<()> {
        let mut state = self.state.write().await;
        let now = self.clock.now();
        state.issuance.set_rate(amount, period, precision, now)?;
        Ok(())
    }

    /// Mint new native tokens into the root pot
    pub async fn mint_tokens(&self, amount: u128) -> ColonyResult<()> {
        let mut state = self.state.write().await;
        let now = self.clock.now();
        state.issuance.mint(amount, now)?;
        state.pots.credit(PotId(1), self.native_token, amount)?;
        state.events.push(ColonyEvent::TokensMinted {
            token: self.native_token,
            amount,
        });
        info!(amount, "tokens minted");
        Ok(())
    }

    /// How much the emission schedule currently allows to be minted
    pub async fn mintable(&self) -> ColonyResult<u128> {
        let state = self.state.read().await;
        Ok(state.issuance.mintable(self.clock.now())?)
    }

    // --- reputation ---

    /// Verify a member's reputation claim against the currently published
    /// root. The key must name this colony and the caller.
    pub async fn verify_reputation(
        &self,
        key_bytes: &[u8],
        value: &[u8],
        branch_mask: &BranchMask,
        siblings: &[Hash],
        caller: Address,
    ) -> ColonyResult<ReputationKey> {
        let root = self.reputation_root.current_root_hash().await;
        Ok(self
            .verifier
            .verify(key_bytes, value, branch_mask, siblings, &root, caller)?)
    }

    // --- views ---

    /// A snapshot of a task
    pub async fn task(&self, id: TaskId) -> ColonyResult<Task> {
        let state = self.state.read().await;
        Ok(Self::task_ref(&state, id)?.clone())
    }

    /// A task's current authorization nonce
    pub async fn task_nonce(&self, id: TaskId) -> ColonyResult<u64> {
        let state = self.state.read().await;
        Self::task_ref(&state, id)?;
        Ok(state.nonces.get(&id).copied().unwrap_or(0))
    }

    /// A snapshot of a domain
    pub async fn domain(&self, id: DomainId) -> ColonyResult<Domain> {
        let state = self.state.read().await;
        Ok(state.domains.domain(id)?.clone())
    }

    /// A pot's balance in one token
    pub async fn pot_balance(&self, pot: PotId, token: TokenId) -> ColonyResult<u128> {
        let state = self.state.read().await;
        Ok(state.pots.balance(pot, token)?)
    }

    /// Total native supply minted so far
    pub async fn total_supply(&self) -> u128 {
        self.state.read().await.issuance.total_supply()
    }

    /// The current emission rate
    pub async fn issuance_rate(&self) -> IssuanceRate {
        self.state.read().await.issuance.rate()
    }

    /// The event log so far
    pub async fn events(&self) -> Vec<ColonyEvent> {
        self.state.read().await.events.clone()
    }

    // --- internals ---

    fn authorize(
        &self,
        state: &ColonyState,
        task_id: TaskId,
        call: &EncodedCall,
        assignment: Option<(Role, Address)>,
        auth: &CallAuthorization,
    ) -> ColonyResult<()> {
        let task = Self::task_ref(state, task_id)?;
        let nonce = state.nonces.get(&task_id).copied().unwrap_or(0);
        let requirement = self
            .engine
            .requirement_for(call.selector, assignment, task.roles.manager)?;
        self.engine
            .authorize(requirement, task_id, nonce, &task.roles, call, auth)?;
        Ok(())
    }

    fn task_ref(state: &ColonyState, id: TaskId) -> ColonyResult<&Task> {
        state
            .tasks
            .get(&id)
            .ok_or_else(|| LifecycleError::TaskNotFound(id).into())
    }

    fn task_mut(state: &mut ColonyState, id: TaskId) -> ColonyResult<&mut Task> {
        state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| LifecycleError::TaskNotFound(id).into())
    }

    fn bump_nonce(state: &mut ColonyState, id: TaskId) {
        let nonce = state.nonces.entry(id).or_insert(0);
        *nonce = nonce.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::skills::InMemorySkillRegistry;
    use colony_reputation::StaticRootOracle;

    fn colony() -> Colony {
        Colony::with_clock(
            Address([0xc0; 20]),
            ColonyConfig::default(),
            SkillId(1),
            Arc::new(InMemorySkillRegistry::new()),
            Arc::new(StaticRootOracle::new()),
            Arc::new(ManualClock::at(1_000)),
        )
    }

    #[tokio::test]
    async fn test_create_task_allocates_pot_and_nonce() {
        let colony = colony();
        let manager = Address([1u8; 20]);
        let task = colony.create_task(manager, DomainId(1), SkillId(1)).await.unwrap();
        assert_eq!(task, TaskId(1));
        let snapshot = colony.task(task).await.unwrap();
        assert_eq!(snapshot.pot_id, PotId(2));
        assert_eq!(snapshot.roles.manager, manager);
        assert_eq!(colony.task_nonce(task).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_task_needs_known_skill_and_domain() {
        let colony = colony();
        let manager = Address([1u8; 20]);
        assert!(matches!(
            colony.create_task(manager, DomainId(1), SkillId(9)).await,
            Err(ColonyError::SkillNotFound(SkillId(9)))
        ));
        assert!(matches!(
            colony.create_task(manager, DomainId(9), SkillId(1)).await,
            Err(ColonyError::Ledger(LedgerError::DomainNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_add_domain_allocates_fresh_skill_and_pot() {
        let colony = colony();
        let child = colony.add_domain(DomainId(1)).await.unwrap();
        let domain = colony.domain(child).await.unwrap();
        assert_eq!(domain.parent, Some(DomainId(1)));
        assert_eq!(domain.pot_id, PotId(2));
        assert_eq!(domain.skill_id, SkillId(2));
    }

    #[tokio::test]
    async fn test_funding_flows_through_pots() {
        let colony = colony();
        colony.set_issuance_rate(600, 60, 1_000_000).await.unwrap();
        // no time has passed since the rate was set
        assert_eq!(colony.mintable().await.unwrap(), 0);
        assert!(colony.mint_tokens(10).await.is_err());
        let token = colony.native_token();
        let task = colony
            .create_task(Address([1u8; 20]), DomainId(1), SkillId(1))
            .await
            .unwrap();
        let pot = colony.task(task).await.unwrap().pot_id;
        assert!(colony.move_funds(PotId(1), pot, token, 10).await.is_err());
        assert_eq!(colony.pot_balance(pot, token).await.unwrap(), 0);
    }
}
