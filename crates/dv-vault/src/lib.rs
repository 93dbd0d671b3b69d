//! # dv-vault
//!
//! Custodial accounts with owner-controlled delegated spending.
//!
//! An owner creates an [`AccountRecord`] with an initial balance and a
//! [`SpendPolicy`](dv_policy::SpendPolicy), receiving an
//! [`OwnerCapability`]. The owner mints [`AgentCapability`] tokens for
//! delegates and can revoke any of them, permanently. A delegate holding a
//! valid capability calls [`AccountRecord::delegated_withdraw`] — the
//! authoritative enforcement path, which validates every policy dimension
//! in a fixed order and, only if all pass, atomically debits the balance,
//! advances the counters, and produces one audit event.
//!
//! The hosting ledger serializes all operations per account record, so the
//! engine is synchronous: no locks, no retries, no suspension points.
//! Callers wanting an early verdict before paying to submit use
//! [`dv_policy::precheck`] on a snapshot; both paths run the same predicate.
//!
//! ## Key invariants
//!
//! - **Bearer authority**: holding a capability token is the proof of
//!   authority; owner operations check only the account binding, agent
//!   operations additionally require registry membership.
//! - **Revocation is permanent**: a removed capability id is never
//!   re-added; mint a new capability instead.
//! - **Check-then-commit is total**: either balance, total_spent,
//!   operation_count, and last_operation_ms all advance together, or the
//!   operation fails with no observable change.

pub mod account;
pub mod capability;
pub mod error;

pub use account::{AccountRecord, CreatedAccount, MintedCapability, Withdrawal};
pub use capability::{AgentCapability, OwnerCapability};
pub use error::VaultError;
