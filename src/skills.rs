//! The global skill registry
//!
//! Skills classify work across colonies, so the registry lives outside any
//! single colony's state. The engine only needs existence checks and the
//! ability to mint a fresh skill for each new domain.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use colony_common::SkillId;

/// The skill taxonomy shared by every colony
#[async_trait]
pub trait SkillRegistry: Send + Sync {
    /// Whether the skill is registered
    async fn skill_exists(&self, id: SkillId) -> bool;

    /// Register a fresh skill and return its id
    async fn add_skill(&self) -> SkillId;
}

struct SkillState {
    skills: BTreeSet<SkillId>,
    next: u64,
}

/// An in-process skill registry, seeded with the root skill
#[derive(Clone)]
pub struct InMemorySkillRegistry {
    state: Arc<RwLock<SkillState>>,
}

impl InMemorySkillRegistry {
    /// Create a registry holding only skill 1
    pub fn new() -> Self {
        let mut skills = BTreeSet::new();
        skills.insert(SkillId(1));
        Self {
            state: Arc::new(RwLock::new(SkillState { skills, next: 2 })),
        }
    }
}

impl Default for InMemorySkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SkillRegistry for InMemorySkillRegistry {
    async fn skill_exists(&self, id: SkillId) -> bool {
        self.state.read().await.skills.contains(&id)
    }

    async fn add_skill(&self) -> SkillId {
        let mut state = self.state.write().await;
        let id = SkillId(state.next);
        state.next += 1;
        state.skills.insert(id);
        id
    }
}
