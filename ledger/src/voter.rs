//! Voter state: a credit budget and the current allocation per proposal.

use quadfund_types::{Credits, ProposalId, VoterId, Votes};
use std::collections::BTreeMap;

use crate::cost::quadratic_cost;

/// A registered voter.
///
/// `allocations` never holds a zero entry; clearing an allocation removes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voter {
    pub id: VoterId,
    pub credits: Credits,
    allocations: BTreeMap<ProposalId, Votes>,
}

impl Voter {
    pub fn new(id: VoterId, credits: Credits) -> Self {
        Self {
            id,
            credits,
            allocations: BTreeMap::new(),
        }
    }

    /// Votes currently placed on `proposal` (0 if none).
    pub fn allocation(&self, proposal: &ProposalId) -> Votes {
        self.allocations.get(proposal).copied().unwrap_or(0)
    }

    /// Current allocations, ordered by proposal id.
    pub fn allocations(&self) -> impl Iterator<Item = (&ProposalId, Votes)> {
        self.allocations.iter().map(|(p, v)| (p, *v))
    }

    /// Σ votes² over all allocations.
    pub fn credits_used(&self) -> Credits {
        self.allocations
            .values()
            .fold(0, |acc: Credits, v| acc.saturating_add(quadratic_cost(*v)))
    }

    pub fn credits_remaining(&self) -> Credits {
        self.credits.saturating_sub(self.credits_used())
    }

    /// Set-to semantics. Zero removes the entry. Only the allocation path calls this.
    pub(crate) fn set_allocation(&mut self, proposal: &ProposalId, votes: Votes) {
        if votes == 0 {
            self.allocations.remove(proposal);
        } else {
            self.allocations.insert(proposal.clone(), votes);
        }
    }
}
