// account.rs — The account record and its operations.
//
// One mutable record per custodial account: balance, policy, spend
// counters, capability registry. The hosting ledger serializes every
// operation that touches the same record, so each method is a single
// synchronous check-then-commit with no internal locking.
//
// Owner operations are gated by a single binding check (the capability's
// account id equals this account's id). The delegated path additionally
// requires registry membership and runs the full ordered predicate from
// dv-policy before committing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dv_audit::{AuditEvent, VaultAction};
use dv_policy::{
    evaluate_spend, AccountSnapshot, ActionTag, PolicyViolation, SpendPolicy, SpendState,
};

use crate::capability::{AgentCapability, OwnerCapability};
use crate::error::VaultError;

/// A custodial account: funds, policy, counters, and the registry of
/// currently honored agent capabilities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRecord {
    account_id: Uuid,
    /// The controlling principal. Set at creation, never changes.
    owner: String,
    balance: u64,
    policy: SpendPolicy,
    /// Ids of agent capabilities currently honored. Membership is what
    /// matters; a removed id is never re-added.
    authorized_capabilities: HashSet<Uuid>,
    /// Cumulative delegated spend since the last counter reset.
    /// `total_spent <= policy.max_budget` after every successful
    /// delegated withdrawal, by induction from the budget check.
    total_spent: u64,
    /// Time of the most recent successful delegated withdrawal; 0 = never.
    last_operation_ms: u64,
    /// Successful delegated withdrawals since the last counter reset.
    operation_count: u64,
}

/// Result of creating an account: the record, the owner's proof of
/// control, and the creation audit event.
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub account: AccountRecord,
    pub owner_capability: OwnerCapability,
    pub event: AuditEvent,
}

/// Result of minting an agent capability: the token to hand to the
/// recipient, and the audit event.
#[derive(Debug, Clone)]
pub struct MintedCapability {
    pub capability: AgentCapability,
    pub event: AuditEvent,
}

/// Result of a successful withdrawal: the released amount and the audit
/// event describing the transition.
#[derive(Debug, Clone)]
pub struct Withdrawal {
    pub amount: u64,
    pub event: AuditEvent,
}

impl AccountRecord {
    /// Create an account with an initial deposit and a full policy.
    ///
    /// Counters start at zero and the capability registry starts empty.
    /// Anyone may create their own account; this never fails.
    pub fn create(
        owner: impl Into<String>,
        initial_deposit: u64,
        policy: SpendPolicy,
    ) -> CreatedAccount {
        let account_id = Uuid::new_v4();
        let owner_capability = OwnerCapability::issue(account_id);

        let account = Self {
            account_id,
            owner: owner.into(),
            balance: initial_deposit,
            policy,
            authorized_capabilities: HashSet::new(),
            total_spent: 0,
            last_operation_ms: 0,
            operation_count: 0,
        };

        tracing::info!(%account_id, balance = initial_deposit, "account created");

        let event = account
            .event(VaultAction::AccountCreated)
            .with_capability(owner_capability.capability_id)
            .with_amount(initial_deposit);

        CreatedAccount {
            account,
            owner_capability,
            event,
        }
    }

    // =========================================================================
    // Owner lifecycle operations
    // =========================================================================

    /// Add a positive amount to the balance.
    pub fn deposit(
        &mut self,
        cap: &OwnerCapability,
        amount: u64,
    ) -> Result<AuditEvent, VaultError> {
        self.require_owner(cap)?;
        if amount == 0 {
            return Err(PolicyViolation::ZeroAmount.into());
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(VaultError::BalanceOverflow { amount })?;

        tracing::debug!(account_id = %self.account_id, amount, balance = self.balance, "deposit");
        Ok(self.event(VaultAction::Deposit).with_amount(amount))
    }

    /// Withdraw part of the balance as the owner.
    ///
    /// Owner withdrawals never touch the spend counters — those exist
    /// solely to bound the delegated path.
    pub fn withdraw_partial(
        &mut self,
        cap: &OwnerCapability,
        amount: u64,
    ) -> Result<Withdrawal, VaultError> {
        self.require_owner(cap)?;
        if amount == 0 {
            return Err(PolicyViolation::ZeroAmount.into());
        }
        if amount > self.balance {
            return Err(PolicyViolation::InsufficientBalance {
                amount,
                balance: self.balance,
            }
            .into());
        }

        self.balance -= amount;

        tracing::debug!(account_id = %self.account_id, amount, balance = self.balance, "owner withdrawal");
        Ok(Withdrawal {
            amount,
            event: self.event(VaultAction::OwnerWithdrawal).with_amount(amount),
        })
    }

    /// Drain the balance to zero as the owner, returning the prior balance.
    ///
    /// Always succeeds given a valid capability, even on an empty account.
    pub fn withdraw_all(&mut self, cap: &OwnerCapability) -> Result<Withdrawal, VaultError> {
        self.require_owner(cap)?;

        let drained = self.balance;
        self.balance = 0;

        tracing::debug!(account_id = %self.account_id, amount = drained, "owner drained account");
        Ok(Withdrawal {
            amount: drained,
            event: self
                .event(VaultAction::OwnerWithdrawal)
                .with_amount(drained),
        })
    }

    /// Replace the policy atomically and wholesale.
    ///
    /// Counters and the capability registry are untouched. A replacement
    /// may lower `max_budget` below `total_spent` already accumulated; the
    /// delegated path then reports zero remaining budget until a counter
    /// reset.
    pub fn replace_policy(
        &mut self,
        cap: &OwnerCapability,
        policy: SpendPolicy,
    ) -> Result<AuditEvent, VaultError> {
        self.require_owner(cap)?;
        self.policy = policy;

        tracing::info!(account_id = %self.account_id, "policy replaced");
        Ok(self.event(VaultAction::PolicyReplaced))
    }

    /// Reset the spend counters: cumulative spend, operation count, and
    /// the last-operation time all return to their creation values.
    pub fn reset_counters(&mut self, cap: &OwnerCapability) -> Result<AuditEvent, VaultError> {
        self.require_owner(cap)?;

        self.total_spent = 0;
        self.operation_count = 0;
        self.last_operation_ms = 0;

        tracing::info!(account_id = %self.account_id, "spend counters reset");
        Ok(self.event(VaultAction::CountersReset))
    }

    /// Mint a new agent capability bound to this account and register it.
    ///
    /// The returned token is the authority — hand it to the recipient.
    pub fn mint_agent_capability(
        &mut self,
        cap: &OwnerCapability,
        recipient: impl Into<String>,
    ) -> Result<MintedCapability, VaultError> {
        self.require_owner(cap)?;

        let capability = AgentCapability::mint(self.account_id, recipient);
        self.authorized_capabilities
            .insert(capability.capability_id);

        tracing::info!(
            account_id = %self.account_id,
            capability_id = %capability.capability_id,
            recipient = %capability.recipient,
            "agent capability minted"
        );

        let event = self
            .event(VaultAction::CapabilityMinted)
            .with_capability(capability.capability_id);
        Ok(MintedCapability { capability, event })
    }

    /// Revoke an agent capability by id. Permanent: the id is never
    /// re-added, so an already revoked (or never minted) id is an error.
    pub fn revoke_agent_capability(
        &mut self,
        cap: &OwnerCapability,
        capability_id: Uuid,
    ) -> Result<AuditEvent, VaultError> {
        self.require_owner(cap)?;

        if !self.authorized_capabilities.remove(&capability_id) {
            return Err(VaultError::InvalidCapability {
                capability_id,
                account_id: self.account_id,
            });
        }

        tracing::info!(account_id = %self.account_id, %capability_id, "agent capability revoked");
        Ok(self
            .event(VaultAction::CapabilityRevoked)
            .with_capability(capability_id))
    }

    // =========================================================================
    // Delegated withdrawal — the authoritative enforcement path
    // =========================================================================

    /// Withdraw funds under the account's policy, authorized by an agent
    /// capability.
    ///
    /// Checks run in a fixed order, short-circuiting on the first failure:
    /// zero amount, capability binding, registry membership, then the
    /// shared policy predicate (expiry, cooldown, per-operation ceiling,
    /// budget, whitelist, balance). On success the commit is total —
    /// balance, cumulative spend, last-operation time, and operation count
    /// advance together, and one audit event is produced.
    pub fn delegated_withdraw(
        &mut self,
        cap: &AgentCapability,
        amount: u64,
        action: ActionTag,
        now_ms: u64,
    ) -> Result<Withdrawal, VaultError> {
        // A zero request is reported as such even when the capability is
        // also bad; the predicate repeats this check for snapshot callers.
        if amount == 0 {
            return Err(PolicyViolation::ZeroAmount.into());
        }

        if cap.account_id != self.account_id {
            return Err(VaultError::InvalidCapability {
                capability_id: cap.capability_id,
                account_id: self.account_id,
            });
        }
        if !self.authorized_capabilities.contains(&cap.capability_id) {
            return Err(VaultError::InvalidCapability {
                capability_id: cap.capability_id,
                account_id: self.account_id,
            });
        }

        evaluate_spend(&self.policy, &self.spend_state(), Some(amount), action, now_ms)?;

        // All checks passed — the commit cannot fail partway. The
        // subtraction cannot underflow and the addition cannot overflow:
        // the predicate just bounded `amount` by `balance` and by
        // `max_budget - total_spent`.
        self.balance -= amount;
        self.total_spent += amount;
        self.last_operation_ms = now_ms;
        self.operation_count += 1;

        tracing::info!(
            account_id = %self.account_id,
            capability_id = %cap.capability_id,
            amount,
            action,
            now_ms,
            total_spent = self.total_spent,
            "delegated withdrawal committed"
        );

        let event = self
            .event(VaultAction::DelegatedWithdrawal)
            .with_capability(cap.capability_id)
            .with_amount(amount)
            .with_action(action)
            .with_decision_time(now_ms);

        Ok(Withdrawal { amount, event })
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn account_id(&self) -> Uuid {
        self.account_id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn policy(&self) -> &SpendPolicy {
        &self.policy
    }

    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }

    pub fn last_operation_ms(&self) -> u64 {
        self.last_operation_ms
    }

    pub fn operation_count(&self) -> u64 {
        self.operation_count
    }

    /// Whether a capability id is currently honored.
    pub fn is_authorized(&self, capability_id: Uuid) -> bool {
        self.authorized_capabilities.contains(&capability_id)
    }

    pub fn authorized_capabilities(&self) -> &HashSet<Uuid> {
        &self.authorized_capabilities
    }

    /// A point-in-time view for the advisory pre-check. The snapshot and
    /// the live record evaluate through the same predicate, so on matching
    /// inputs the verdicts agree.
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            account_id: self.account_id,
            policy: self.policy.clone(),
            state: self.spend_state(),
        }
    }

    fn spend_state(&self) -> SpendState {
        SpendState {
            balance: self.balance,
            total_spent: self.total_spent,
            operation_count: self.operation_count,
            last_operation_ms: self.last_operation_ms,
        }
    }

    fn require_owner(&self, cap: &OwnerCapability) -> Result<(), VaultError> {
        if cap.account_id != self.account_id {
            return Err(VaultError::NotOwner {
                capability_id: cap.capability_id,
                account_id: self.account_id,
            });
        }
        Ok(())
    }

    /// Event seeded with the resulting counter values; call after mutating.
    fn event(&self, kind: VaultAction) -> AuditEvent {
        AuditEvent::new(self.account_id, kind).with_totals(
            self.total_spent,
            self.policy.remaining_budget(self.total_spent),
            self.operation_count,
        )
    }
}
