//! Proposal records.

use quadfund_types::{Address, Amount, ProposalId, TxRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a proposal. Allocation is only possible while `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Active,
    Distributed,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Active => "active",
            ProposalStatus::Distributed => "distributed",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fundable proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub description: Option<String>,
    pub funding_pool: Amount,
    pub created_by: Address,
    pub status: ProposalStatus,
    /// Payout transfer reference, set when the proposal is distributed.
    pub distribution_tx: Option<TxRef>,
}

impl Proposal {
    pub fn is_active(&self) -> bool {
        self.status == ProposalStatus::Active
    }
}
