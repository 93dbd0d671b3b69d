// capability.rs — Bearer capability tokens.
//
// Holding a token is both the proof of authority and the transfer
// mechanism: handing it to another principal hands over the authority.
// Two disjoint kinds, no hierarchy. An owner capability proves full
// control over exactly one account. An agent capability is honored only
// while its id remains in the account's registry, so revocation is a
// registry removal, not a token destruction — the object may live on,
// powerless.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proof of owner authority over one account.
///
/// Issued once at account creation. Gates deposits, withdrawals, policy
/// replacement, counter resets, and capability minting/revocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerCapability {
    /// Unique identity of this token.
    pub capability_id: Uuid,
    /// The account this token is bound to. Fixed at issuance.
    pub account_id: Uuid,
}

impl OwnerCapability {
    pub(crate) fn issue(account_id: Uuid) -> Self {
        Self {
            capability_id: Uuid::new_v4(),
            account_id,
        }
    }
}

/// Proof of delegate authority over one account.
///
/// Only honored while `capability_id` is present in the account's
/// `authorized_capabilities` registry. Many may exist concurrently for one
/// account; each is independently and permanently revocable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentCapability {
    /// Unique identity of this token — the value the registry tracks.
    pub capability_id: Uuid,
    /// The account this token is bound to. Fixed at minting.
    pub account_id: Uuid,
    /// The principal the owner minted this token for. Informational:
    /// possession, not this label, is what the engine honors.
    pub recipient: String,
}

impl AgentCapability {
    pub(crate) fn mint(account_id: Uuid, recipient: impl Into<String>) -> Self {
        Self {
            capability_id: Uuid::new_v4(),
            account_id,
            recipient: recipient.into(),
        }
    }
}
