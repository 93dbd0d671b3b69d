// precheck.rs — Client-side advisory evaluation.
//
// Submitting the authoritative operation costs money; this pre-check lets
// callers test a previously fetched snapshot first and skip submissions
// that are doomed. It is advisory only: the snapshot may be stale and the
// caller's clock may diverge from the execution environment's, so Allow is
// a hint and Deny must not be the sole gate — the authoritative path is
// always the final arbiter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checks::{self, SpendState};
use crate::policy::{ActionTag, SpendPolicy};

/// A point-in-time view of one account, materialized by whatever queries
/// the ledger on the caller's behalf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub account_id: Uuid,
    pub policy: SpendPolicy,
    pub state: SpendState,
}

/// The advisory verdict.
///
/// `#[derive(PartialEq)]` lets tests compare verdicts with `==`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum PrecheckVerdict {
    /// Every evaluated rule passed on this snapshot.
    Allow,
    /// A rule failed; the reason names the violated dimension.
    Deny { reason: String },
}

impl PrecheckVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PrecheckVerdict::Allow)
    }
}

/// Evaluate a proposed delegated operation against a snapshot.
///
/// Runs the same predicate as the authoritative path. Expiry, cooldown,
/// and the whitelist are always evaluated; the amount-dependent rules only
/// when an amount is supplied (some action tags denote non-transfer
/// operations). Never mutates anything.
pub fn precheck(
    snapshot: &AccountSnapshot,
    action: ActionTag,
    now_ms: u64,
    amount: Option<u64>,
) -> PrecheckVerdict {
    match checks::evaluate_spend(&snapshot.policy, &snapshot.state, amount, action, now_ms) {
        Ok(()) => PrecheckVerdict::Allow,
        Err(violation) => {
            tracing::debug!(account_id = %snapshot.account_id, %violation, "pre-check denied");
            PrecheckVerdict::Deny {
                reason: violation.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn snapshot() -> AccountSnapshot {
        AccountSnapshot {
            account_id: Uuid::new_v4(),
            policy: SpendPolicy {
                max_budget: 100,
                max_per_operation: 10,
                allowed_actions: HashSet::from([0]),
                cooldown_ms: 60_000,
                expires_at_ms: 1_000_000,
            },
            state: SpendState {
                balance: 50,
                total_spent: 0,
                operation_count: 0,
                last_operation_ms: 0,
            },
        }
    }

    #[test]
    fn allows_a_valid_transfer() {
        assert_eq!(precheck(&snapshot(), 0, 500, Some(5)), PrecheckVerdict::Allow);
    }

    #[test]
    fn deny_reason_reports_cooldown_remainder() {
        let mut snap = snapshot();
        snap.state.operation_count = 1;
        snap.state.last_operation_ms = 100_000;

        match precheck(&snap, 0, 100_001, Some(1)) {
            PrecheckVerdict::Deny { reason } => {
                assert!(reason.contains("cooldown"), "got: {reason}");
                assert!(reason.contains("59999ms"), "got: {reason}");
            }
            other => panic!("expected Deny, got {:?}", other),
        }
    }

    #[test]
    fn deny_reason_reports_remaining_budget() {
        let mut snap = snapshot();
        snap.state.total_spent = 97;
        snap.policy.max_per_operation = 100;

        match precheck(&snap, 0, 500, Some(5)) {
            PrecheckVerdict::Deny { reason } => {
                assert!(reason.contains("remaining budget 3"), "got: {reason}");
            }
            other => panic!("expected Deny, got {:?}", other),
        }
    }

    #[test]
    fn non_transfer_check_ignores_balance() {
        let mut snap = snapshot();
        snap.state.balance = 0;
        assert!(precheck(&snap, 0, 500, None).is_allowed());
    }

    #[test]
    fn non_transfer_check_still_enforces_whitelist() {
        match precheck(&snapshot(), 3, 500, None) {
            PrecheckVerdict::Deny { reason } => {
                assert!(reason.contains("action tag 3"), "got: {reason}");
            }
            other => panic!("expected Deny, got {:?}", other),
        }
    }

    #[test]
    fn verdict_serializes_as_snake_case() {
        let json = serde_json::to_string(&PrecheckVerdict::Allow).unwrap();
        assert!(json.contains("\"allow\""));

        let json = serde_json::to_string(&PrecheckVerdict::Deny {
            reason: "x".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"deny\""));
    }
}
