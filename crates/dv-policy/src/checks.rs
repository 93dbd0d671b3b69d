// checks.rs — The ordered spend predicate.
//
// This is the single definition of the rule chain that both evaluation
// paths run: the authoritative path in dv-vault (which commits on success)
// and the advisory pre-check in this crate (which only reports). One
// definition with two callers is what keeps the paths extensionally equal.
//
// The order is a contract — the first violated rule is the one reported:
//
//   zero amount      (only when an amount is supplied)
//   expiry           (strict: a request at the expiry instant is rejected)
//   cooldown         (skipped for the first operation after create/reset)
//   per-op ceiling   (only when an amount is supplied)
//   budget           (only when an amount is supplied)
//   whitelist
//   balance          (only when an amount is supplied)
//
// Capability binding and registry membership sit between the zero-amount
// and expiry rules on the authoritative path; they need the live registry,
// which a snapshot-driven caller does not have.

use serde::{Deserialize, Serialize};

use crate::error::PolicyViolation;
use crate::policy::{ActionTag, SpendPolicy};

/// The mutable counters the predicate reads, decoupled from the record
/// that owns them so snapshots and live accounts evaluate identically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpendState {
    /// Funds currently held by the account.
    pub balance: u64,
    /// Cumulative amount released through the delegated path since the
    /// last counter reset.
    pub total_spent: u64,
    /// Successful delegated withdrawals since the last counter reset.
    pub operation_count: u64,
    /// Time of the most recent successful delegated withdrawal; 0 = never.
    pub last_operation_ms: u64,
}

/// Evaluate the ordered rule chain for a proposed delegated operation.
///
/// `amount` is `None` for non-transfer actions, where only expiry,
/// cooldown, and the whitelist are meaningful. Returns the first violated
/// rule, or `Ok(())` if every rule passes.
pub fn evaluate_spend(
    policy: &SpendPolicy,
    state: &SpendState,
    amount: Option<u64>,
    action: ActionTag,
    now_ms: u64,
) -> Result<(), PolicyViolation> {
    if let Some(amount) = amount {
        if amount == 0 {
            return Err(PolicyViolation::ZeroAmount);
        }
    }

    if now_ms >= policy.expires_at_ms {
        return Err(PolicyViolation::Expired {
            expires_at_ms: policy.expires_at_ms,
            now_ms,
        });
    }

    // The very first operation after creation or a counter reset has no
    // predecessor to space against.
    if state.operation_count > 0 {
        let elapsed = now_ms.saturating_sub(state.last_operation_ms);
        if elapsed < policy.cooldown_ms {
            return Err(PolicyViolation::CooldownActive {
                remaining_ms: policy.cooldown_ms - elapsed,
            });
        }
    }

    if let Some(amount) = amount {
        if amount > policy.max_per_operation {
            return Err(PolicyViolation::PerOperationLimitExceeded {
                amount,
                limit: policy.max_per_operation,
            });
        }

        // Subtraction form, never `total_spent + amount`, so amounts near
        // u64::MAX cannot overflow the comparison.
        let remaining = policy.remaining_budget(state.total_spent);
        if amount > remaining {
            return Err(PolicyViolation::BudgetExceeded { amount, remaining });
        }
    }

    if !policy.allows_action(action) {
        return Err(PolicyViolation::ActionNotWhitelisted { action });
    }

    if let Some(amount) = amount {
        if amount > state.balance {
            return Err(PolicyViolation::InsufficientBalance {
                amount,
                balance: state.balance,
            });
        }
    }

    Ok(())
}
