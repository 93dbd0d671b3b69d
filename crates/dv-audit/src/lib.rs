//! # dv-audit
//!
//! Append-only audit event log for Delegate Vault.
//!
//! Every successful mutating operation on an account — creation, deposits,
//! owner withdrawals, policy replacement, counter resets, capability
//! minting and revocation, delegated withdrawals — produces one
//! [`AuditEvent`]. Events exist for external observers; the enforcement
//! engine never reads them back. The [`AuditLog`] persists them as JSONL
//! (one JSON object per line) with each line hash-chained to its
//! predecessor for tamper evidence.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use dv_audit::{AuditEvent, AuditLog, VaultAction};
//! use uuid::Uuid;
//!
//! let mut log = AuditLog::open("/tmp/vault-audit.jsonl").unwrap();
//! let mut event = AuditEvent::new(Uuid::new_v4(), VaultAction::Deposit).with_amount(250);
//! log.append(&mut event).unwrap();
//! ```

pub mod error;
pub mod event;
pub mod hasher;
pub mod log;

pub use error::AuditError;
pub use event::{AuditEvent, VaultAction};
pub use log::AuditLog;
