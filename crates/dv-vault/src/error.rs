// error.rs — Error types for account operations.

use thiserror::Error;
use uuid::Uuid;

use dv_policy::PolicyViolation;

/// Errors surfaced by account operations.
///
/// Policy-dimension failures pass through from the shared predicate
/// unchanged, so every failure kind stays matchable by callers and tests.
/// Nothing here is retried internally; a failure means no state changed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VaultError {
    /// The presented owner capability is bound to a different account.
    #[error("capability {capability_id} does not prove ownership of account {account_id}")]
    NotOwner {
        capability_id: Uuid,
        account_id: Uuid,
    },

    /// The presented agent capability is bound to a different account,
    /// was revoked, or was never minted for this account.
    #[error("capability {capability_id} is not authorized for account {account_id}")]
    InvalidCapability {
        capability_id: Uuid,
        account_id: Uuid,
    },

    /// A deposit would push the balance past the representable maximum.
    #[error("deposit of {amount} would overflow the account balance")]
    BalanceOverflow { amount: u64 },

    /// A policy dimension rejected the operation.
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
}
