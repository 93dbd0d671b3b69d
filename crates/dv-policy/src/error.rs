// error.rs — Violation kinds for the spend predicate.

use thiserror::Error;

use crate::policy::ActionTag;

/// A policy dimension violated by a proposed delegated withdrawal.
///
/// One variant per rejected precondition. The authoritative path surfaces
/// these verbatim as errors; the advisory pre-check renders them as deny
/// reasons. Display messages name the violated dimension and the computed
/// slack so callers can act on them without parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    /// The requested amount was zero.
    #[error("withdrawal amount must be greater than zero")]
    ZeroAmount,

    /// The policy no longer authorizes any delegated withdrawal.
    /// A request at exactly the expiry instant is rejected.
    #[error("policy expired at {expires_at_ms}ms (decision time {now_ms}ms)")]
    Expired { expires_at_ms: u64, now_ms: u64 },

    /// Not enough time has elapsed since the previous successful withdrawal.
    #[error("cooldown active: {remaining_ms}ms remaining")]
    CooldownActive { remaining_ms: u64 },

    /// The amount exceeds the single-operation ceiling.
    #[error("amount {amount} exceeds per-operation limit {limit}")]
    PerOperationLimitExceeded { amount: u64, limit: u64 },

    /// The amount exceeds what is left of the cumulative budget.
    #[error("amount {amount} exceeds remaining budget {remaining}")]
    BudgetExceeded { amount: u64, remaining: u64 },

    /// The action tag is not on the policy whitelist.
    #[error("action tag {action} is not whitelisted")]
    ActionNotWhitelisted { action: ActionTag },

    /// The account balance cannot cover the amount.
    #[error("amount {amount} exceeds account balance {balance}")]
    InsufficientBalance { amount: u64, balance: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_violated_dimension() {
        // Deny reasons are shown to callers deciding whether to submit;
        // each must carry the computed slack, not just a kind name.
        let msg = PolicyViolation::CooldownActive { remaining_ms: 1500 }.to_string();
        assert!(msg.contains("1500ms"));

        let msg = PolicyViolation::BudgetExceeded {
            amount: 7,
            remaining: 3,
        }
        .to_string();
        assert!(msg.contains('7') && msg.contains('3'));

        let msg = PolicyViolation::ActionNotWhitelisted { action: 42 }.to_string();
        assert!(msg.contains("42"));
    }
}
