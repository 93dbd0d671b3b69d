// policy.rs — Spend policy definition.
//
// A spend policy is the complete set of bounds an owner places on the
// delegated path: cumulative budget, per-operation ceiling, action
// whitelist, cooldown spacing, and a hard expiry. It is a value type —
// the owner replaces it wholesale, never field by field.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Tag identifying a class of delegated action. The namespace of tags is
/// assigned by the embedding application; the engine only tests membership
/// against the whitelist.
pub type ActionTag = u16;

/// The bounds governing one account's delegated withdrawals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpendPolicy {
    /// Ceiling on cumulative spend through the delegated path.
    pub max_budget: u64,
    /// Ceiling on a single withdrawal amount.
    pub max_per_operation: u64,
    /// Action tags the delegate may invoke. An empty set permits nothing.
    pub allowed_actions: HashSet<ActionTag>,
    /// Minimum spacing between consecutive successful withdrawals.
    pub cooldown_ms: u64,
    /// Hard cutoff: no delegated withdrawal at or after this instant.
    pub expires_at_ms: u64,
}

impl SpendPolicy {
    /// Budget left under this policy given cumulative spend so far.
    ///
    /// Clamps to zero if `total_spent` has outrun `max_budget` — possible
    /// only when a replacement policy lowered the budget below spend
    /// already accumulated under the old one. The clamp makes the next
    /// budget check fail cleanly instead of underflowing.
    pub fn remaining_budget(&self, total_spent: u64) -> u64 {
        self.max_budget.saturating_sub(total_spent)
    }

    /// Whether the whitelist permits this action tag.
    pub fn allows_action(&self, action: ActionTag) -> bool {
        self.allowed_actions.contains(&action)
    }
}
