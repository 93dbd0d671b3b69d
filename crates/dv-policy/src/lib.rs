//! # dv-policy
//!
//! Spend policy definitions and the shared enforcement predicate for
//! Delegate Vault.
//!
//! A [`SpendPolicy`] bounds what a delegate may withdraw from a custodial
//! account: cumulative budget, per-operation ceiling, action whitelist,
//! cooldown spacing, and a hard expiry. The same ordered rule chain is
//! evaluated in two places — the authoritative path inside `dv-vault`,
//! which commits the state transition, and the advisory [`precheck`] here,
//! which only reports. Both consume the single definition in
//! [`checks::evaluate_spend`], so the two paths cannot drift apart.
//!
//! ## Key invariants
//!
//! - **Ordered short-circuit**: the first violated rule is the one
//!   reported; callers and tests distinguish failures by kind.
//! - **Empty whitelist denies everything**: there is no implicit grant.
//! - **Subtraction-form budget check**: remaining budget is computed as
//!   `max_budget - total_spent`, never as `total_spent + amount`, so
//!   amounts near `u64::MAX` cannot overflow the comparison.

pub mod checks;
pub mod error;
pub mod policy;
pub mod precheck;

pub use checks::{evaluate_spend, SpendState};
pub use error::PolicyViolation;
pub use policy::{ActionTag, SpendPolicy};
pub use precheck::{precheck, AccountSnapshot, PrecheckVerdict};
