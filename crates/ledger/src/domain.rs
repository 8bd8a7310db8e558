//! Organizational domains
//!
//! Domains form a strict tree rooted at domain 1. Each carries a skill
//! classification and owns a pot. Domains are created by admin action and
//! never deleted; funds flow from the root pot downward.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use colony_common::{DomainId, PotId, SkillId};

use crate::error::{LedgerError, LedgerResult};

/// An organizational subdivision with its own skill and pot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    /// Identifier; domain 1 is the root
    pub id: DomainId,
    /// Parent in the tree; the root has none
    pub parent: Option<DomainId>,
    /// Skill classification
    pub skill_id: SkillId,
    /// The domain's funding pot
    pub pot_id: PotId,
}

/// The domain tree
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    domains: HashMap<DomainId, Domain>,
    next_domain: u64,
}

impl DomainRegistry {
    /// Create the registry with the root domain over pot 1
    pub fn new(root_skill: SkillId) -> Self {
        let mut domains = HashMap::new();
        domains.insert(
            DomainId(1),
            Domain {
                id: DomainId(1),
                parent: None,
                skill_id: root_skill,
                pot_id: PotId(1),
            },
        );
        Self {
            domains,
            next_domain: 2,
        }
    }

    /// Add a child domain under `parent` with the given skill and pot
    pub fn add_domain(
        &mut self,
        parent: DomainId,
        skill_id: SkillId,
        pot_id: PotId,
    ) -> LedgerResult<DomainId> {
        if !self.domains.contains_key(&parent) {
            return Err(LedgerError::DomainNotFound(parent));
        }
        let id = DomainId(self.next_domain);
        self.next_domain += 1;
        self.domains.insert(
            id,
            Domain {
                id,
                parent: Some(parent),
                skill_id,
                pot_id,
            },
        );
        info!(domain = %id, %parent, skill = %skill_id, "domain added");
        Ok(id)
    }

    /// Look up a domain
    pub fn domain(&self, id: DomainId) -> LedgerResult<&Domain> {
        self.domains.get(&id).ok_or(LedgerError::DomainNotFound(id))
    }

    /// Number of domains
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Never true: the root always exists
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_domain() {
        let registry = DomainRegistry::new(SkillId(1));
        let root = registry.domain(DomainId(1)).unwrap();
        assert_eq!(root.pot_id, PotId(1));
        assert_eq!(root.parent, None);
    }

    #[test]
    fn test_add_domain_requires_parent() {
        let mut registry = DomainRegistry::new(SkillId(1));
        assert_eq!(
            registry.add_domain(DomainId(9), SkillId(2), PotId(2)),
            Err(LedgerError::DomainNotFound(DomainId(9)))
        );
        let child = registry
            .add_domain(DomainId(1), SkillId(2), PotId(2))
            .unwrap();
        assert_eq!(child, DomainId(2));
        assert_eq!(registry.domain(child).unwrap().parent, Some(DomainId(1)));
    }
}
