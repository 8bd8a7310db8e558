//! The reviewer registry
//!
//! A static mapping from operation selector to the reviewers whose
//! co-signatures authorize it. Built once when the engine starts and
//! read-only thereafter.

use std::collections::HashMap;

use colony_tasks::Role;

use crate::calls;
use crate::selector::Selector;

/// Who must co-sign an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reviewers {
    /// A fixed pair of role holders; the same role twice means a single
    /// signature from that holder suffices
    Roles(Role, Role),
    /// The manager plus the address being assigned to the role — the
    /// assignee consents to their own assignment. Collapses to a single
    /// manager signature when the assignee already is the manager.
    ManagerAndAssignee,
}

/// The selector → reviewers table
#[derive(Debug, Clone)]
pub struct ReviewerRegistry {
    entries: HashMap<Selector, Reviewers>,
}

impl ReviewerRegistry {
    /// The standard colony operation table
    pub fn standard() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            calls::set_task_brief(),
            Reviewers::Roles(Role::Manager, Role::Worker),
        );
        entries.insert(
            calls::set_task_due_date(),
            Reviewers::Roles(Role::Manager, Role::Worker),
        );
        entries.insert(
            calls::set_task_skill(),
            Reviewers::Roles(Role::Manager, Role::Worker),
        );
        entries.insert(
            calls::set_task_role(Role::Manager),
            Reviewers::ManagerAndAssignee,
        );
        entries.insert(
            calls::set_task_role(Role::Evaluator),
            Reviewers::ManagerAndAssignee,
        );
        entries.insert(
            calls::set_task_role(Role::Worker),
            Reviewers::ManagerAndAssignee,
        );
        entries.insert(
            calls::set_task_payout(Role::Manager),
            Reviewers::Roles(Role::Manager, Role::Manager),
        );
        entries.insert(
            calls::set_task_payout(Role::Evaluator),
            Reviewers::Roles(Role::Manager, Role::Evaluator),
        );
        entries.insert(
            calls::set_task_payout(Role::Worker),
            Reviewers::Roles(Role::Manager, Role::Worker),
        );
        entries.insert(
            calls::finalize_task(),
            Reviewers::Roles(Role::Manager, Role::Worker),
        );
        entries.insert(
            calls::cancel_task(),
            Reviewers::Roles(Role::Manager, Role::Worker),
        );
        Self { entries }
    }

    /// Look up the reviewers for a selector
    pub fn reviewers(&self, selector: Selector) -> Option<Reviewers> {
        self.entries.get(&selector).copied()
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let registry = ReviewerRegistry::standard();
        assert_eq!(registry.len(), 11);
        assert_eq!(
            registry.reviewers(calls::set_task_brief()),
            Some(Reviewers::Roles(Role::Manager, Role::Worker))
        );
        assert_eq!(
            registry.reviewers(calls::set_task_payout(Role::Manager)),
            Some(Reviewers::Roles(Role::Manager, Role::Manager))
        );
        assert_eq!(
            registry.reviewers(calls::set_task_role(Role::Worker)),
            Some(Reviewers::ManagerAndAssignee)
        );
        assert_eq!(registry.reviewers(Selector::of("unknown()")), None);
    }
}
