// event.rs — Audit event data model.
//
// One event per successful state transition. Events carry the resulting
// counter values (total spent, remaining budget, operation count) rather
// than deltas, so an observer can reconstruct account history from the
// stream alone. Each event links to the prior one via `previous_hash`,
// set by the log at append time.

use chrono::{DateTime, Utc};
use dv_policy::ActionTag;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which account transition this event records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VaultAction {
    /// An account was created with an initial deposit and policy.
    AccountCreated,
    /// The owner added funds.
    Deposit,
    /// The owner withdrew funds (partial or full drain).
    OwnerWithdrawal,
    /// The owner replaced the spend policy wholesale.
    PolicyReplaced,
    /// The owner reset the spend counters.
    CountersReset,
    /// The owner minted an agent capability.
    CapabilityMinted,
    /// The owner revoked an agent capability.
    CapabilityRevoked,
    /// A delegate withdrew funds through the enforcement path.
    DelegatedWithdrawal,
}

/// A single audit event — one line in the JSONL audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique identifier for this event.
    pub event_id: Uuid,

    /// Wall-clock time the event was recorded (UTC). Distinct from
    /// `decided_at_ms`, which is the caller-supplied decision time.
    pub recorded_at: DateTime<Utc>,

    /// The account whose state changed.
    pub account_id: Uuid,

    /// What kind of transition occurred.
    pub kind: VaultAction,

    /// The capability that authorized the transition, where one was
    /// presented (delegated withdrawals, mints, revocations).
    pub capability_id: Option<Uuid>,

    /// The amount moved, or 0 for transitions that move no funds.
    pub amount: u64,

    /// The action tag of a delegated withdrawal.
    pub action: Option<ActionTag>,

    /// Cumulative delegated spend after this transition.
    pub total_spent: u64,

    /// Budget left under the current policy after this transition.
    pub remaining_budget: u64,

    /// Successful delegated withdrawals after this transition.
    pub operation_count: u64,

    /// The caller-supplied decision time of a delegated withdrawal, in
    /// milliseconds. Owner operations carry no decision clock.
    pub decided_at_ms: Option<u64>,

    /// Hash of the previous event's JSON line (tamper chain). The first
    /// event in a log has this set to None. Assigned by the log.
    pub previous_hash: Option<String>,
}

impl AuditEvent {
    /// Create a new event with a random id and the current wall-clock time.
    ///
    /// Counter fields start at zero — set them with the builder methods
    /// before handing the event out.
    pub fn new(account_id: Uuid, kind: VaultAction) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            account_id,
            kind,
            capability_id: None,
            amount: 0,
            action: None,
            total_spent: 0,
            remaining_budget: 0,
            operation_count: 0,
            decided_at_ms: None,
            previous_hash: None,
        }
    }

    /// Set the authorizing capability and return self (builder pattern).
    pub fn with_capability(mut self, capability_id: Uuid) -> Self {
        self.capability_id = Some(capability_id);
        self
    }

    /// Set the amount moved and return self.
    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    /// Set the delegated action tag and return self.
    pub fn with_action(mut self, action: ActionTag) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the resulting counter values and return self.
    pub fn with_totals(
        mut self,
        total_spent: u64,
        remaining_budget: u64,
        operation_count: u64,
    ) -> Self {
        self.total_spent = total_spent;
        self.remaining_budget = remaining_budget;
        self.operation_count = operation_count;
        self
    }

    /// Set the caller-supplied decision time and return self.
    pub fn with_decision_time(mut self, now_ms: u64) -> Self {
        self.decided_at_ms = Some(now_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_round_trip() {
        let event = AuditEvent::new(Uuid::new_v4(), VaultAction::DelegatedWithdrawal)
            .with_capability(Uuid::new_v4())
            .with_amount(5)
            .with_action(2)
            .with_totals(5, 95, 1)
            .with_decision_time(123_456);

        let json = serde_json::to_string(&event).expect("serialize");
        let restored: AuditEvent = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(event.event_id, restored.event_id);
        assert_eq!(event.kind, restored.kind);
        assert_eq!(event.capability_id, restored.capability_id);
        assert_eq!(event.amount, restored.amount);
        assert_eq!(event.action, restored.action);
        assert_eq!(event.total_spent, restored.total_spent);
        assert_eq!(event.remaining_budget, restored.remaining_budget);
        assert_eq!(event.decided_at_ms, restored.decided_at_ms);
    }

    #[test]
    fn event_ids_are_unique() {
        let account = Uuid::new_v4();
        let e1 = AuditEvent::new(account, VaultAction::Deposit);
        let e2 = AuditEvent::new(account, VaultAction::Deposit);
        assert_ne!(e1.event_id, e2.event_id);
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&VaultAction::DelegatedWithdrawal).unwrap();
        assert_eq!(json, "\"delegated_withdrawal\"");
    }
}
